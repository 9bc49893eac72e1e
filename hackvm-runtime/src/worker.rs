//! Out-of-process validation contract
//!
//! A host hands each spend to a worker as a [`RunRequest`] with hex-encoded
//! buffers and gets a [`RunResponse`] back. Malformed requests are answered,
//! not fatal: the error text travels in the response.

use crate::error::{Result, RuntimeError};
use crate::interpreter::{Interpreter, RunContext};
use serde::{Deserialize, Serialize};
use std::io::{BufRead, Write};
use tracing::{debug, warn};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunRequest {
    /// Previous transaction hash (hex)
    pub hash: String,
    /// Unlocking code (hex)
    pub input: String,
    /// Locking code (hex)
    pub output: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunResponse {
    pub error: Option<String>,
    pub result: bool,
}

impl RunResponse {
    fn failed(err: &RuntimeError) -> Self {
        Self {
            error: Some(err.to_string()),
            result: false,
        }
    }
}

fn decode_field(field: &'static str, value: &str) -> Result<Vec<u8>> {
    hex::decode(value).map_err(|source| RuntimeError::InvalidHex { field, source })
}

fn run_request(interpreter: &mut Interpreter, request: &RunRequest) -> Result<bool> {
    let hash = decode_field("hash", &request.hash)?;
    let input = decode_field("input", &request.input)?;
    let output = decode_field("output", &request.output)?;

    let result = interpreter.run(&RunContext::new(&hash, &output, &input))?;
    Ok(result.is_accept())
}

/// Validate one request
pub fn handle_request(interpreter: &mut Interpreter, request: &RunRequest) -> RunResponse {
    match run_request(interpreter, request) {
        Ok(result) => RunResponse { error: None, result },
        Err(err) => {
            warn!(error = %err, "request failed");
            RunResponse::failed(&err)
        }
    }
}

/// Answer JSON-lines requests from `reader` until end of input
///
/// Returns the number of requests served. Only I/O failures end the loop
/// early.
pub fn serve<R: BufRead, W: Write>(
    interpreter: &mut Interpreter,
    reader: R,
    mut writer: W,
) -> Result<usize> {
    let mut served = 0;

    for line in reader.lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }

        let response = match serde_json::from_str::<RunRequest>(&line) {
            Ok(request) => handle_request(interpreter, &request),
            Err(err) => RunResponse::failed(&RuntimeError::from(err)),
        };

        serde_json::to_writer(&mut writer, &response)?;
        writer.write_all(b"\n")?;
        writer.flush()?;
        served += 1;
    }

    debug!(served, "worker input closed");
    Ok(served)
}
