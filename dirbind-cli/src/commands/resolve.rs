//! Command to evaluate an operation chain from the root contract.

use crate::error::CliError;
use crate::utils::{
    binding_json, path_json, print_json, print_lines, root_binding, GlobalOptions, OutputFormat,
};
use clap::Args;
use dirbind::Value;

/// Evaluate a dotted operation chain such as `src.main.java` or
/// `src.file(docs/readme.md)`.
#[derive(Args)]
pub struct ResolveCommand {
    /// Operation chain, evaluated left to right from the root contract
    #[arg(value_name = "CHAIN")]
    pub chain: String,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Plain)]
    pub format: OutputFormat,
}

/// One step of a chain: an operation and its optional subpath argument.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Step {
    /// Operation name.
    pub operation: String,
    /// Explicit subpath, from `operation(arg)`.
    pub argument: Option<String>,
}

/// Split a chain on dots outside parentheses.
///
/// # Errors
///
/// Returns `InvalidArguments` for empty steps, unbalanced parentheses or
/// text after a closing parenthesis.
pub fn parse_chain(chain: &str) -> Result<Vec<Step>, CliError> {
    let mut segments = Vec::new();
    let mut current = String::new();
    let mut depth = 0usize;
    for c in chain.chars() {
        match c {
            '(' => {
                depth += 1;
                current.push(c);
            }
            ')' => {
                depth = depth.checked_sub(1).ok_or_else(|| {
                    CliError::InvalidArguments(format!("unbalanced ')' in '{chain}'"))
                })?;
                current.push(c);
            }
            '.' if depth == 0 => segments.push(std::mem::take(&mut current)),
            _ => current.push(c),
        }
    }
    if depth != 0 {
        return Err(CliError::InvalidArguments(format!(
            "unclosed '(' in '{chain}'"
        )));
    }
    segments.push(current);

    segments.iter().map(|s| parse_step(s, chain)).collect()
}

fn parse_step(segment: &str, chain: &str) -> Result<Step, CliError> {
    let segment = segment.trim();
    let (operation, argument) = match segment.find('(') {
        Some(open) => {
            let Some(inner) = segment[open + 1..].strip_suffix(')') else {
                return Err(CliError::InvalidArguments(format!(
                    "unexpected text after ')' in '{chain}'"
                )));
            };
            (&segment[..open], Some(inner.to_string()))
        }
        None => (segment, None),
    };
    if operation.is_empty() {
        return Err(CliError::InvalidArguments(format!(
            "empty operation in '{chain}'"
        )));
    }
    Ok(Step {
        operation: operation.to_string(),
        argument,
    })
}

impl ResolveCommand {
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        let steps = parse_chain(&self.chain)?;
        let mut value = Value::Contract(root_binding(global)?);

        for step in &steps {
            let binding = match value {
                Value::Contract(binding) => binding,
                other => {
                    return Err(CliError::SemanticFailure(format!(
                        "cannot apply '{}' to a {} result",
                        step.operation,
                        other.kind()
                    )))
                }
            };
            log::debug!("{binding:?}.{}", step.operation);
            value = match &step.argument {
                Some(arg) => binding.call_with(&step.operation, arg)?,
                None => binding.call(&step.operation)?,
            };
        }

        match self.format {
            OutputFormat::Plain => print_lines(plain_lines(value)?),
            OutputFormat::Json => print_json(&to_json(value)?),
        }
    }
}

fn plain_lines(value: Value) -> Result<Vec<String>, CliError> {
    Ok(match value {
        Value::Unit => Vec::new(),
        Value::Bool(b) => vec![b.to_string()],
        Value::Path(path) => vec![path.display().to_string()],
        Value::Contract(binding) => vec![binding.anchor().display().to_string()],
        Value::Wrapped(wrapped) => vec![format!("<{}>", wrapped.type_name())],
        collection @ (Value::Array(_) | Value::Sequence(_)) => {
            let mut lines = Vec::new();
            for element in collection.into_values()? {
                lines.extend(plain_lines(element?)?);
            }
            lines
        }
    })
}

fn to_json(value: Value) -> Result<serde_json::Value, CliError> {
    Ok(match value {
        Value::Unit => serde_json::Value::Null,
        Value::Bool(b) => serde_json::Value::Bool(b),
        Value::Path(path) => path_json(&path),
        Value::Contract(binding) => binding_json(&binding),
        Value::Wrapped(wrapped) => serde_json::json!({ "type": wrapped.type_name() }),
        collection @ (Value::Array(_) | Value::Sequence(_)) => {
            let elements = collection
                .into_values()?
                .map(|element| element.map_err(CliError::from).and_then(to_json))
                .collect::<Result<Vec<_>, _>>()?;
            serde_json::Value::Array(elements)
        }
    })
}
