mod report_engine;

pub use report_engine::ReportEngine;
