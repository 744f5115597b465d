//! Daemon mode – line-delimited JSON requests over a Unix socket.
//!
//! Each connection gets its own calculator; state lives as long as the
//! connection does.

use calc_engine::types::*;
use calc_engine::{Calculator, CommandRegistry, EngineConfig};
use std::path::PathBuf;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::UnixListener;

pub async fn run_daemon(
    socket_path: PathBuf,
    engine_config: EngineConfig,
    registry: CommandRegistry,
) -> anyhow::Result<()> {
    // Remove stale socket if it exists
    let _ = std::fs::remove_file(&socket_path);

    let listener = UnixListener::bind(&socket_path).map_err(|e| {
        anyhow::anyhow!("cannot bind socket {}: {}", socket_path.display(), e)
    })?;

    tracing::info!(socket = %socket_path.display(), "calcctl daemon listening");

    loop {
        match listener.accept().await {
            Ok((stream, _addr)) => {
                let mut calc = Calculator::with_config(engine_config.clone());
                let (reader, mut writer) = stream.into_split();
                let mut lines = BufReader::new(reader).lines();

                while let Ok(Some(line)) = lines.next_line().await {
                    let response = handle_request(&line, &mut calc, &registry);
                    let mut resp_json =
                        serde_json::to_string(&response).unwrap_or_else(|_| "{}".into());
                    resp_json.push('\n');
                    if writer.write_all(resp_json.as_bytes()).await.is_err() {
                        break;
                    }
                }
                tracing::debug!("connection closed");
            }
            Err(e) => {
                tracing::warn!(error = %e, "accept error");
            }
        }
    }
}

fn handle_request(line: &str, calc: &mut Calculator, registry: &CommandRegistry) -> DaemonResponse {
    let req: DaemonRequest = match serde_json::from_str(line) {
        Ok(r) => r,
        Err(e) => {
            return DaemonResponse {
                id: "unknown".into(),
                result: None,
                error: Some(ErrorInfo {
                    code: ErrorCode::InvalidInput,
                    message: format!("invalid JSON request: {}", e),
                }),
            };
        }
    };

    let result = match req.method.as_str() {
        "call" => {
            let cmd_name = req.params.get("cmd").and_then(|v| v.as_str()).unwrap_or("");
            let args = req
                .params
                .get("args")
                .cloned()
                .unwrap_or(serde_json::Value::Object(Default::default()));
            registry.execute(cmd_name, args, calc)
        }
        "list" => {
            let mut r = result_ok("list", "commands", &new_run_id(), 0);
            r.data = Some(serde_json::json!(registry.list()));
            r
        }
        other => {
            return DaemonResponse {
                id: req.id,
                result: None,
                error: Some(ErrorInfo {
                    code: ErrorCode::InvalidInput,
                    message: format!("unknown method: {}", other),
                }),
            };
        }
    };

    DaemonResponse {
        id: req.id,
        result: Some(result),
        error: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_call_keeps_state_across_requests() {
        let mut calc = Calculator::new();
        let reg = CommandRegistry::new();

        let r = handle_request(
            r#"{"id":"1","method":"call","params":{"cmd":"press","args":{"keys":"6 ×"}}}"#,
            &mut calc,
            &reg,
        );
        assert_eq!(r.id, "1");
        assert_eq!(r.result.unwrap().status, Status::Pass);

        let r = handle_request(
            r#"{"id":"2","method":"call","params":{"cmd":"press","args":{"keys":"7 ="}}}"#,
            &mut calc,
            &reg,
        );
        assert_eq!(r.result.unwrap().data.unwrap()["display"], "42");
    }

    #[test]
    fn test_bad_requests() {
        let mut calc = Calculator::new();
        let reg = CommandRegistry::new();

        let r = handle_request("not json", &mut calc, &reg);
        assert_eq!(r.id, "unknown");
        assert_eq!(r.error.unwrap().code, ErrorCode::InvalidInput);

        let r = handle_request(r#"{"id":"9","method":"explode"}"#, &mut calc, &reg);
        assert_eq!(r.id, "9");
        assert!(r.result.is_none());
    }

    #[test]
    fn test_list_method() {
        let mut calc = Calculator::new();
        let reg = CommandRegistry::new();
        let r = handle_request(r#"{"id":"3","method":"list"}"#, &mut calc, &reg);
        let data = r.result.unwrap().data.unwrap();
        assert!(data.as_array().unwrap().iter().any(|v| v == "press"));
    }
}
