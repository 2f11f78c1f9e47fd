//! JSON-lines driver.
//!
//! Reads one request object per input line and writes one response object per
//! output line. Blank lines are skipped; end of input ends the loop.

use std::io::{self, BufRead, Write};

use tracing::info;

use crate::api::chess_service::ChessService;

pub fn run_stdio_loop(service: &ChessService) -> io::Result<()> {
    let stdin = io::stdin();
    let stdout = io::stdout();
    run_loop(service, stdin.lock(), stdout.lock())
}

pub fn run_loop<R: BufRead, W: Write>(
    service: &ChessService,
    input: R,
    mut output: W,
) -> io::Result<()> {
    let mut handled = 0u64;
    let mut failed = 0u64;
    for line in input.lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let response = service.respond(&line);
        if !response.is_success() {
            failed += 1;
        }
        writeln!(output, "{}", response.to_json_line())?;
        output.flush()?;
        handled += 1;
    }

    info!(requests = handled, failed, "input closed");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::run_loop;
    use crate::api::chess_service::ChessService;
    use crate::config::ServiceConfig;

    #[test]
    fn one_response_line_per_request_line() {
        let service = ChessService::new(ServiceConfig::default());
        let input = concat!(
            r#"{"op":"post-move","fromRow":6,"fromCol":4,"toRow":4,"toCol":4,"color":"white"}"#,
            "\n\n",
            r#"{"op":"get-fen"}"#,
            "\n",
            "garbage\n",
        );
        let mut output = Vec::new();
        run_loop(&service, input.as_bytes(), &mut output).expect("loop should finish");

        let text = String::from_utf8(output).expect("output should be utf-8");
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].contains(r#""move":"e2e4""#));
        assert!(lines[1].contains("4P3"));
        assert!(lines[2].contains(r#""error":"invalid_request""#));
    }
}
