use serde_json::Value;

use custseg_core::dashboard::options_report;

use super::DatasetArgs;

pub fn run_options(args: DatasetArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let store = args.load_store()?;
    Ok(serde_json::to_value(options_report(&store))?)
}
