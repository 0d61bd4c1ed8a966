use std::fs;
use std::io::{Read, Write};
use std::net::TcpListener;
use std::path::Path;
use std::process::{Command, Output};
use std::thread::{spawn, JoinHandle};

use anyhow::{anyhow, Result};
use tempfile::tempdir;

const TRANSACTIONS_RESPONSE: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<credit-card-transactions type="collection">
  <transaction>
    <id>k1m2n3</id>
    <status>settled</status>
    <type>sale</type>
    <amount>120.00</amount>
    <order-id>ORD-7</order-id>
    <created-at type="datetime">2024-02-29T23:10:00Z</created-at>
    <service-fee-amount>2.10</service-fee-amount>
    <custom-fields><description>Leap day order</description></custom-fields>
    <payment-instrument-type>credit_card</payment-instrument-type>
    <processor-authorization-code>AUTH77</processor-authorization-code>
    <refund-id>z9y8x7w6</refund-id>
    <settlement-batch-id>2024-03-01_mercato</settlement-batch-id>
  </transaction>
  <transaction>
    <id>p4q5r6</id>
    <status>settled</status>
    <type>credit</type>
    <amount>15.50</amount>
    <order-id nil="true"/>
    <created-at type="datetime">2024-02-10T12:00:00Z</created-at>
    <service-fee-amount nil="true"/>
    <custom-fields nil="true"/>
    <payment-instrument-type>paypal_account</payment-instrument-type>
    <processor-authorization-code nil="true"/>
    <refund-id nil="true"/>
    <settlement-batch-id>2024-02-11_mercato</settlement-batch-id>
  </transaction>
</credit-card-transactions>"#;

fn search_ids_response(ids: &[&str]) -> String {
    let items: String = ids.iter().map(|id| format!("<item>{id}</item>")).collect();
    format!("<search-results><page-size type=\"integer\">50</page-size><ids type=\"array\">{items}</ids></search-results>")
}

fn spawn_stub_gateway(responses: Vec<String>) -> Result<(String, JoinHandle<usize>)> {
    let listener = TcpListener::bind("127.0.0.1:0")?;
    let url = format!("http://{}", listener.local_addr()?);

    let handle = spawn(move || {
        let mut served = 0;

        for body in responses {
            let Ok((mut stream, _)) = listener.accept() else { break };
            read_request(&mut stream);

            let response = format!(
                "HTTP/1.1 200 OK\r\nContent-Type: application/xml\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                body.len()
            );
            if stream.write_all(response.as_bytes()).is_ok() {
                served += 1;
            }
        }

        served
    });

    Ok((url, handle))
}

fn read_request(stream: &mut impl Read) {
    let mut buffer = Vec::new();
    let mut chunk = [0u8; 4096];

    while let Ok(read) = stream.read(&mut chunk) {
        if read == 0 {
            break;
        }
        buffer.extend_from_slice(&chunk[..read]);

        let text = String::from_utf8_lossy(&buffer);
        if let Some(header_end) = text.find("\r\n\r\n") {
            let content_length = text[..header_end]
                .lines()
                .filter_map(|line| line.split_once(':'))
                .find(|(name, _)| name.eq_ignore_ascii_case("content-length"))
                .and_then(|(_, value)| value.trim().parse::<usize>().ok())
                .unwrap_or(0);

            if buffer.len() >= header_end + 4 + content_length {
                break;
            }
        }
    }
}

fn run_report(working_dir: &Path, args: &[&str], with_credentials: bool) -> Result<Output> {
    let binary_path = env!("CARGO_BIN_EXE_braintree-report");
    let mut command = Command::new(binary_path);

    command.env_clear().current_dir(working_dir).args(args);

    if with_credentials {
        command
            .env("mercato_braintree_merchant_id", "mercato")
            .env("mercato_braintree_public_key", "public")
            .env("mercato_braintree_private_key", "private");
    }

    Ok(command.output()?)
}

#[test]
fn test_cli_fails_fast_without_credentials() -> Result<()> {
    let working_dir = tempdir()?;
    let output = run_report(working_dir.path(), &["--month", "2024-02"], false)?;

    assert!(!output.status.success());

    let stderr = String::from_utf8(output.stderr)?;
    assert!(stderr.contains("mercato_braintree_merchant_id"));
    assert!(!working_dir.path().join("reports").exists());

    Ok(())
}

#[test]
fn test_cli_rejects_malformed_month_before_querying() -> Result<()> {
    let working_dir = tempdir()?;
    let output = run_report(
        working_dir.path(),
        &["--month", "2024-13", "--gateway-url", "http://127.0.0.1:9"],
        true
    )?;

    assert!(!output.status.success());

    let stderr = String::from_utf8(output.stderr)?;
    assert!(stderr.contains("Invalid month '2024-13'"));
    assert!(!working_dir.path().join("reports").exists());

    Ok(())
}

#[test]
fn test_cli_writes_monthly_reports_from_gateway() -> Result<()> {
    let working_dir = tempdir()?;
    let (url, stub) = spawn_stub_gateway(vec![
        search_ids_response(&["k1m2n3", "p4q5r6"]),
        TRANSACTIONS_RESPONSE.to_string(),
    ])?;

    let output = run_report(working_dir.path(), &["--month", "2024-02", "--gateway-url", &url], true)?;
    let served = stub.join().map_err(|_| anyhow!("stub gateway panicked"))?;

    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
    assert_eq!(served, 2);

    let reports_dir = working_dir.path().join("reports");
    let report = fs::read_to_string(reports_dir.join("2024-02 braintree_api_report.csv"))?;
    let mut lines = report.lines();

    assert_eq!(
        lines.next(),
        Some("braintree_id,order_id,type,created_at,amount,service_fee,custom_description,status,payment_type,processor_auth_code,refund_id,settlement_batch_id,batch_date")
    );
    assert_eq!(
        lines.next(),
        Some("k1m2n3,ORD-7,sale,2024-02-29 23:10:00,120.00,2.10,Leap day order,settled,credit_card,AUTH77,z9y8x7w6,2024-03-01_mercato,2024-03-01")
    );
    assert_eq!(
        lines.next(),
        Some("p4q5r6,,credit,2024-02-10 12:00:00,-15.50,,,settled,paypal_account,,,2024-02-11_mercato,2024-02-11")
    );
    assert_eq!(lines.next(), None);

    let refunds = fs::read_to_string(reports_dir.join("2024-02 braintree_api_report_refunds.csv"))?;
    assert_eq!(refunds, "refund_id,custom_description\nz9y8x7w6,Leap day order\n");

    let stderr = String::from_utf8(output.stderr)?;
    assert!(stderr.contains("Generating report for 2024-02..."));
    assert!(stderr.contains("2024-02 report generated successfully"));

    Ok(())
}

#[test]
fn test_cli_generates_each_requested_month() -> Result<()> {
    let working_dir = tempdir()?;
    let (url, stub) = spawn_stub_gateway(vec![search_ids_response(&[]), search_ids_response(&[])])?;

    let output = run_report(
        working_dir.path(),
        &["--month", "2023-11", "--month", "2023-12", "--gateway-url", &url, "--reports-dir", "out"],
        true
    )?;
    let served = stub.join().map_err(|_| anyhow!("stub gateway panicked"))?;

    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
    assert_eq!(served, 2);

    for label in ["2023-11", "2023-12"] {
        let report = fs::read_to_string(working_dir.path().join("out").join(format!("{label} braintree_api_report.csv")))?;
        assert_eq!(report.lines().count(), 1);
        assert!(working_dir.path().join("out").join(format!("{label} braintree_api_report_refunds.csv")).exists());
    }

    Ok(())
}
