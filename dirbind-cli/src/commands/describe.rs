//! Command to describe the layout's contracts.

use crate::error::CliError;
use crate::utils::{load_catalog, print_json, print_lines, GlobalOptions, OutputFormat};
use clap::Args;
use dirbind::descriptor::{ContractDescriptor, CreateAction, OperationDescriptor, TargetRule};
use serde_json::json;
use std::sync::Arc;

/// List operation signatures and metadata.
#[derive(Args)]
pub struct DescribeCommand {
    /// Contract to describe (all contracts if omitted)
    #[arg(value_name = "CONTRACT")]
    pub contract: Option<String>,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Plain)]
    pub format: OutputFormat,
}

impl DescribeCommand {
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        let catalog = load_catalog(global)?;

        let contracts: Vec<&Arc<ContractDescriptor>> = match &self.contract {
            Some(name) => vec![catalog.contract(name).ok_or_else(|| {
                CliError::InvalidArguments(format!("layout defines no contract '{name}'"))
            })?],
            None => catalog
                .contract_names()
                .filter_map(|name| catalog.contract(name))
                .collect(),
        };

        match self.format {
            OutputFormat::Plain => {
                let mut lines = Vec::new();
                for contract in contracts {
                    let marker = if contract.name() == catalog.root_name() {
                        " (root)"
                    } else {
                        ""
                    };
                    lines.push(format!("{}{marker}", contract.name()));
                    for op in contract.operations() {
                        lines.push(format!("  {}", op.signature()));
                        let details = details(op);
                        if !details.is_empty() {
                            lines.push(format!("      {}", details.join(", ")));
                        }
                    }
                }
                print_lines(lines)
            }
            OutputFormat::Json => {
                let value: Vec<serde_json::Value> = contracts
                    .into_iter()
                    .map(|contract| {
                        let operations: Vec<serde_json::Value> =
                            contract.operations().map(operation_json).collect();
                        json!({
                            "name": contract.name(),
                            "root": contract.name() == catalog.root_name(),
                            "operations": operations,
                        })
                    })
                    .collect();
                print_json(&serde_json::Value::Array(value))
            }
        }
    }
}

fn target(op: &OperationDescriptor) -> String {
    match op.target_rule() {
        TargetRule::Child { name_override } => {
            format!("child {}", name_override.as_deref().unwrap_or(op.name()))
        }
        TargetRule::Ascend(depth) => format!("ascend {depth}"),
    }
}

/// Metadata worth showing under a signature.
fn details(op: &OperationDescriptor) -> Vec<String> {
    let mut details = Vec::new();
    if op.has_default_body() {
        details.push("default body".to_string());
        return details;
    }
    if !op.takes_argument() {
        details.push(target(op));
    }
    if op.action() != CreateAction::None {
        details.push(op.action().to_string());
    }
    if let Some(bounds) = op.walk_bounds() {
        details.push(format!("walk {bounds}"));
    }
    if !op.filters().is_empty() {
        details.push(format!("filters [{}]", op.filters().names().join(", ")));
    }
    if op.must_exist() {
        details.push("must exist".to_string());
    }
    details
}

fn operation_json(op: &OperationDescriptor) -> serde_json::Value {
    json!({
        "name": op.name(),
        "signature": op.signature(),
        "returns": op.element_name(),
        "collection": op.collection().to_string(),
        "target": if op.takes_argument() { "argument".to_string() } else { target(op) },
        "action": op.action().to_string(),
        "walk": op.walk_bounds().map(|b| b.to_string()),
        "filters": op.filters().names(),
        "must_exist": op.must_exist(),
    })
}
