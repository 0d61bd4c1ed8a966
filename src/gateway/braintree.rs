use std::collections::HashMap;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use reqwest::Client;
use rust_decimal::Decimal;
use tracing::debug;

use crate::config::Config;
use crate::gateway::errors::GatewayError;
use crate::gateway::xml::XmlNode;
use crate::gateway::{SearchCriteria, TransactionSearch};
use crate::models::{Transaction, TransactionType};

const API_VERSION: &str = "6";
const USER_AGENT: &str = concat!("braintree-report/", env!("CARGO_PKG_VERSION"));
const XML_CONTENT_TYPE: &str = "application/xml";
const DEFAULT_PAGE_SIZE: usize = 50;

/// Client for the Braintree XML transaction search API.
///
/// A search is two steps: `advanced_search_ids` returns every matching ID and
/// the page size, then `advanced_search` is called once per page of IDs.
pub struct BraintreeGateway {
    client: Client,
    merchant_url: String,
    public_key: String,
    private_key: String
}

impl BraintreeGateway {
    pub fn new(config: &Config) -> Result<Self, GatewayError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(USER_AGENT)
            .build()
            .map_err(GatewayError::Client)?;

        Ok(Self {
            client,
            merchant_url: format!("{}/merchants/{}", config.base_url().trim_end_matches('/'), config.merchant_id),
            public_key: config.public_key.clone(),
            private_key: config.private_key.clone()
        })
    }

    async fn post(&self, path: &str, body: String) -> Result<String, GatewayError> {
        let url = format!("{}/{}", self.merchant_url, path);

        let response = self.client
            .post(&url)
            .basic_auth(&self.public_key, Some(&self.private_key))
            .header(ACCEPT, XML_CONTENT_TYPE)
            .header(CONTENT_TYPE, XML_CONTENT_TYPE)
            .header("X-ApiVersion", API_VERSION)
            .body(body)
            .send()
            .await
            .map_err(|source| GatewayError::Transport { url: url.clone(), source })?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|source| GatewayError::Transport { url: url.clone(), source })?;

        if !status.is_success() {
            return Err(GatewayError::from_status(status.as_u16(), &url, &text));
        }

        Ok(text)
    }
}

impl TransactionSearch for BraintreeGateway {
    async fn search(&self, criteria: &SearchCriteria) -> Result<Vec<Transaction>, GatewayError> {
        let response = self.post("transactions/advanced_search_ids", criteria.to_xml(&[])).await?;
        let search_ids = parse_search_ids(&response)?;

        debug!("Search matched {} transactions (page size {})", search_ids.ids.len(), search_ids.page_size);

        let mut transactions = Vec::with_capacity(search_ids.ids.len());

        for (page, ids) in search_ids.ids.chunks(search_ids.page_size).enumerate() {
            let response = self.post("transactions/advanced_search", criteria.to_xml(ids)).await?;
            let fetched = parse_transactions(&response)?;

            debug!("Fetched page {} with {} transactions", page + 1, fetched.len());

            transactions.extend(fetched);
        }

        Ok(transactions)
    }
}

/// IDs matched by `advanced_search_ids`.
#[derive(Debug, PartialEq, Eq)]
pub struct SearchIds {
    pub page_size: usize,
    pub ids: Vec<String>
}

pub fn parse_search_ids(xml: &str) -> Result<SearchIds, GatewayError> {
    let root = XmlNode::parse(xml)?;

    if root.name != "search-results" {
        return Err(GatewayError::missing_element("search-results", &root.name));
    }

    let page_size = root
        .child("page-size")
        .and_then(XmlNode::value)
        .and_then(|value| value.parse::<usize>().ok())
        .filter(|size| *size > 0)
        .unwrap_or(DEFAULT_PAGE_SIZE);

    let ids = root
        .child("ids")
        .map(|ids| {
            ids.children_named("item")
                .filter_map(XmlNode::value)
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default();

    Ok(SearchIds { page_size, ids })
}

pub fn parse_transactions(xml: &str) -> Result<Vec<Transaction>, GatewayError> {
    let root = XmlNode::parse(xml)?;

    if root.name != "credit-card-transactions" {
        return Err(GatewayError::missing_element("credit-card-transactions", &root.name));
    }

    root.children_named("transaction")
        .map(parse_transaction)
        .collect()
}

fn parse_transaction(node: &XmlNode) -> Result<Transaction, GatewayError> {
    let id = required(node, "id", "")?.to_string();

    let transaction_type = TransactionType::from(required(node, "type", &id)?);

    let created_at = required(node, "created-at", &id)?;
    let created_at = DateTime::parse_from_rfc3339(created_at)
        .map(|timestamp| timestamp.with_timezone(&Utc))
        .map_err(|error| GatewayError::invalid_value(&id, "created-at", created_at, error))?;

    let amount = parse_decimal(&id, "amount", required(node, "amount", &id)?)?;

    let service_fee = optional(node, "service-fee-amount")
        .map(|value| parse_decimal(&id, "service-fee-amount", &value))
        .transpose()?;

    let status = required(node, "status", &id)?.to_string();

    Ok(Transaction {
        order_id: optional(node, "order-id"),
        transaction_type,
        created_at,
        amount,
        service_fee,
        custom_fields: custom_fields(node),
        status,
        payment_instrument_type: optional(node, "payment-instrument-type").unwrap_or_default(),
        processor_authorization_code: optional(node, "processor-authorization-code"),
        refund_id: optional(node, "refund-id"),
        settlement_batch_id: optional(node, "settlement-batch-id"),
        id
    })
}

fn required<'a>(node: &'a XmlNode, element: &str, transaction_id: &str) -> Result<&'a str, GatewayError> {
    node.child(element)
        .and_then(XmlNode::value)
        .ok_or_else(|| {
            let parent = if transaction_id.is_empty() {
                node.name.clone()
            } else {
                format!("{} {}", node.name, transaction_id)
            };
            GatewayError::missing_element(element, &parent)
        })
}

fn optional(node: &XmlNode, element: &str) -> Option<String> {
    node.child(element)
        .and_then(XmlNode::value)
        .map(str::to_string)
}

fn parse_decimal(transaction_id: &str, element: &str, value: &str) -> Result<Decimal, GatewayError> {
    Decimal::from_str(value).map_err(|error| GatewayError::invalid_value(transaction_id, element, value, error))
}

/// Custom field tags are dasherized on the wire; keys use underscores.
fn custom_fields(node: &XmlNode) -> Option<HashMap<String, String>> {
    let fields = node.child("custom-fields").filter(|fields| !fields.is_nil())?;

    Some(
        fields.children
            .iter()
            .map(|field| (field.name.replace('-', "_"), field.value().unwrap_or_default().to_string()))
            .collect()
    )
}
