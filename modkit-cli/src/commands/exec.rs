//! `modkit exec` command.
//!
//! Runs a command by name with a JSON parameter object and prints the JSON
//! response, exactly as an embedding host would see it:
//!
//! ```text
//! modkit exec create_item --params '{"package_id":"Jane.ExampleMod","title":"Gun01","kind":"SPAWNABLE","asset_path":"Assets/Gun01.prefab"}'
//! ```

use clap::Args;
use serde_json::Value;

use super::CommandContext;
use crate::error::CliError;

/// Arguments of `modkit exec`.
#[derive(Debug, Args)]
pub struct ExecArgs {
    /// Command name (e.g., create_package, create_item, pack_package)
    pub command: String,

    /// Parameters as a JSON object
    #[arg(long, short)]
    pub params: Option<String>,
}

/// Parse `--params`. A missing value is an empty parameter set.
pub fn parse_params(params: Option<&str>) -> Result<Value, CliError> {
    match params.map(str::trim) {
        None | Some("") => Ok(Value::Null),
        Some(text) => {
            serde_json::from_str(text).map_err(|e| CliError::InvalidParams(e.to_string()))
        }
    }
}

/// Run a command by name. Output is always JSON.
pub fn run(args: ExecArgs, ctx: &CommandContext) -> Result<(), CliError> {
    let params = parse_params(args.params.as_deref())?;
    let json_ctx = CommandContext::new(ctx.workshop, ctx.output, true);
    json_ctx.dispatch(&args.command, params).map(|_| ())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::testing::workshop;
    use crate::output::testing::BufferOutput;
    use tempfile::TempDir;

    #[test]
    fn test_parse_params() {
        assert_eq!(parse_params(None).unwrap(), Value::Null);
        assert_eq!(parse_params(Some("  ")).unwrap(), Value::Null);
        assert_eq!(parse_params(Some(r#"{"a":1}"#)).unwrap()["a"], 1);
        assert!(matches!(
            parse_params(Some("{nope")),
            Err(CliError::InvalidParams(_))
        ));
    }

    #[test]
    fn test_exec_prints_json_even_without_flag() {
        let temp = TempDir::new().unwrap();
        let workshop = workshop(&temp);
        let out = BufferOutput::default();
        let ctx = CommandContext::new(&workshop, &out, false);

        run(
            ExecArgs {
                command: "create_package".to_string(),
                params: Some(r#"{"author":"Jane","name":"ExampleMod"}"#.to_string()),
            },
            &ctx,
        )
        .unwrap();

        let value: Value = serde_json::from_str(&out.text()).unwrap();
        assert_eq!(value["success"], true);
        assert_eq!(value["data"]["identifier"], "Jane.ExampleMod");
    }
}
