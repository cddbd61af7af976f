use bs_core::BrickScopeError;
use std::fmt::Display;

fn map_error(code: &'static str, error: impl Display) -> BrickScopeError {
    BrickScopeError::new(code, error.to_string())
}

pub(crate) fn emit_error(error: BrickScopeError) -> i32 {
    println!("RESULT:ERROR");
    println!("ERROR_CODE:{}", error.code);
    println!(
        "ERROR_MSG_JSON:{}",
        serde_json::to_string(&error.message).expect("string json")
    );
    1
}

pub(crate) fn map_cli_project_path(error: std::io::Error) -> BrickScopeError {
    map_error("CLI_PROJECT_PATH", error)
}

pub(crate) fn map_cli_output(error: serde_json::Error) -> BrickScopeError {
    map_error("CLI_OUTPUT", error)
}

#[cfg(test)]
mod error_map_tests {
    use super::*;

    #[test]
    fn emit_error_returns_non_zero_exit_code() {
        let code = emit_error(BrickScopeError::new("ERR", "failed"));
        assert_eq!(code, 1);
    }

    #[test]
    fn mapping_helpers_keep_error_codes() {
        assert_eq!(
            map_cli_project_path(std::io::Error::other("path")).code,
            "CLI_PROJECT_PATH"
        );
        let invalid = serde_json::from_str::<serde_json::Value>("{").expect_err("invalid json");
        assert_eq!(map_cli_output(invalid).code, "CLI_OUTPUT");
    }
}
