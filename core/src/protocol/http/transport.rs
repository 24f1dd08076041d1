/*
 * transport.rs
 * Copyright (C) 2026 Chris Burdess
 *
 * This file is part of Corriere, an HTTP client core driving an external transport.
 *
 * Corriere is free software: you can redistribute it and/or modify
 * it under the terms of the GNU General Public License as published by
 * the Free Software Foundation, either version 3 of the License, or
 * (at your option) any later version.
 *
 * Corriere is distributed in the hope that it will be useful,
 * but WITHOUT ANY WARRANTY; without even the implied warranty of
 * MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
 * GNU General Public License for more details.
 *
 * You should have received a copy of the GNU General Public License
 * along with Corriere.  If not, see <http://www.gnu.org/licenses/>.
 */

//! Transport invocation: turn a request into a command line, run the transport process, and
//! hand its output to response assembly.
//!
//! Argument vector: `[flags..., -X, METHOD, (-H, "Name: value")..., url, body args...]`.
//!
//! Three shapes:
//! - no body: input is null; output buffered.
//! - text / JSON body: passed on the command line with `--data-raw`; input is null.
//! - raw bytes or a form with file fields: `--data-binary @-`, body written to the process
//!   input while stdout and stderr are drained by separate tasks. Multipart bodies are encoded
//!   on the fly, so file contents never sit in memory as a whole.
//!
//! Outcome order for streamed bodies: byte-source failure, then non-zero exit, then response
//! assembly. A failed write to the input after a zero exit is not an error.

use std::io;
use std::path::{Path, PathBuf};
use std::process::{ExitStatus, Stdio};
use std::time::Duration;

use bytes::Bytes;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWriteExt, BufWriter};
use tokio::process::{ChildStdin, Command};
use tokio::task::JoinHandle;

use super::headers::HeaderMap;
use super::multipart::MultipartEncoder;
use super::request::{buffered_text, is_json, Body, Method, RequestConfig, RequestDescriptor, SentBody};
use super::response::{assemble, Response};
use crate::config::TransportConfig;
use crate::error::{HttpError, Result};
use crate::uri::encode_url;

const STDIN_ARG: &str = "@-";

/// Body written to the transport's input.
enum Feed {
    Bytes(Bytes),
    Multipart(MultipartEncoder),
}

/// A request resolved into a concrete transport invocation.
pub struct Invocation {
    pub program: PathBuf,
    pub args: Vec<String>,
    pub descriptor: RequestDescriptor,
    pub timeout: Option<Duration>,
    feed: Option<Feed>,
}

impl Invocation {
    /// Resolve method, URL and request options against a transport configuration.
    ///
    /// Fails with `HttpError::InvalidHeader` when a header name or value contains CR or LF.
    pub fn prepare(
        config: &TransportConfig,
        method: Method,
        url: &str,
        request: RequestConfig,
    ) -> Result<Self> {
        let RequestConfig {
            mut headers,
            data,
            timeout,
        } = request;
        check_headers(&headers)?;

        let (body, body_args, feed) = match data {
            None => (SentBody::None, Vec::new(), None),
            Some(Body::Form(form)) if form.has_files() => {
                let encoder = MultipartEncoder::new(form);
                headers.insert("Content-Type", encoder.content_type());
                let body = SentBody::Multipart {
                    boundary: encoder.boundary().to_string(),
                    fields: encoder.field_names(),
                };
                (body, stdin_args(), Some(Feed::Multipart(encoder)))
            }
            Some(Body::Bytes(bytes)) => (SentBody::Bytes(bytes.len()), stdin_args(), Some(Feed::Bytes(bytes))),
            Some(other) => {
                if is_json(&other) && !headers.contains("Content-Type") {
                    headers.insert("Content-Type", "application/json");
                }
                let text = buffered_text(&other).unwrap_or_default();
                let args = vec!["--data-raw".to_string(), text.clone()];
                (SentBody::Buffered(text), args, None)
            }
        };

        let descriptor = RequestDescriptor {
            method,
            url: encode_url(url),
            headers,
            body,
        };
        let mut args = build_args(config, &descriptor);
        args.extend(body_args);

        Ok(Self {
            program: config.program.clone(),
            args,
            descriptor,
            timeout: timeout.or(config.timeout),
            feed,
        })
    }

    /// True when the body is written to the process input rather than passed as an argument.
    pub fn is_streaming(&self) -> bool {
        self.feed.is_some()
    }
}

/// Each `-H` argument must stay one header line.
fn check_headers(headers: &HeaderMap) -> Result<()> {
    let has_break = |s: &str| s.bytes().any(|b| b == b'\r' || b == b'\n');
    match headers.iter().find(|&(name, value)| has_break(name) || has_break(value)) {
        Some((name, _)) => Err(HttpError::InvalidHeader(name.to_string())),
        None => Ok(()),
    }
}

fn stdin_args() -> Vec<String> {
    vec!["--data-binary".to_string(), STDIN_ARG.to_string()]
}

/// Leading flags, method selector, one `-H` per header, then the URL.
pub fn build_args(config: &TransportConfig, descriptor: &RequestDescriptor) -> Vec<String> {
    let mut args = config.flags.clone();
    args.push("-X".to_string());
    args.push(descriptor.method.as_str().to_string());
    for (name, value) in descriptor.headers.iter() {
        args.push("-H".to_string());
        args.push(format!("{}: {}", name, value));
    }
    args.push(descriptor.url.clone());
    args
}

/// Run the invocation and assemble the response.
pub async fn execute(invocation: Invocation) -> Result<Response> {
    let Invocation {
        program,
        args,
        descriptor,
        timeout,
        feed,
    } = invocation;
    log::debug!(
        "{} {} via {}{}",
        descriptor.method,
        descriptor.url,
        program.display(),
        if feed.is_some() { " (streaming body)" } else { "" }
    );

    let mut cmd = Command::new(&program);
    cmd.args(&args).kill_on_drop(true);
    let run = async {
        match feed {
            None => run_buffered(cmd, &program).await,
            Some(feed) => run_streaming(cmd, &program, feed).await,
        }
    };
    let output = match timeout {
        Some(limit) => tokio::time::timeout(limit, run)
            .await
            .map_err(|_| HttpError::Timeout(limit))??,
        None => run.await?,
    };
    assemble(output, descriptor)
}

async fn run_buffered(mut cmd: Command, program: &Path) -> Result<Bytes> {
    cmd.stdin(Stdio::null()).stdout(Stdio::piped()).stderr(Stdio::piped());
    let child = cmd.spawn().map_err(|e| spawn_error(program, e))?;
    let output = child.wait_with_output().await?;
    check_exit(output.status, &output.stderr)?;
    Ok(Bytes::from(output.stdout))
}

async fn run_streaming(mut cmd: Command, program: &Path, feed: Feed) -> Result<Bytes> {
    cmd.stdin(Stdio::piped()).stdout(Stdio::piped()).stderr(Stdio::piped());
    let mut child = cmd.spawn().map_err(|e| spawn_error(program, e))?;
    let stdin = take_pipe(child.stdin.take(), "stdin")?;
    let stdout = take_pipe(child.stdout.take(), "stdout")?;
    let stderr = take_pipe(child.stderr.take(), "stderr")?;

    // Output must be drained while input is written, or a full pipe stalls both sides.
    let out_task = tokio::spawn(read_all(stdout));
    let err_task = tokio::spawn(read_all(stderr));

    let fed = match feed_input(stdin, feed).await {
        Err(HttpError::Source { field, source }) => {
            log::debug!("aborting transport: field {:?} unreadable: {}", field, source);
            if let Err(e) = child.start_kill() {
                log::debug!("kill after read failure: {}", e);
            }
            if let Err(e) = child.wait().await {
                log::debug!("reap after read failure: {}", e);
            }
            out_task.abort();
            err_task.abort();
            return Err(HttpError::Source { field, source });
        }
        other => other,
    };

    let status = child.wait().await?;
    let stdout = join(out_task).await?;
    let stderr = join(err_task).await?;
    check_exit(status, &stderr)?;
    // A clean exit means the exchange finished; the transport may stop reading input early
    // (e.g. the server rejected the upload), and its output is still the response.
    match fed {
        Ok(sent) => log::debug!("streamed {} body bytes", sent),
        Err(HttpError::Io(e)) => log::debug!("transport closed its input early: {}", e),
        Err(e) => return Err(e),
    }
    Ok(Bytes::from(stdout))
}

/// Write the body, then close the input on every path so the process sees EOF.
async fn feed_input(stdin: ChildStdin, feed: Feed) -> Result<u64> {
    let mut sink = BufWriter::new(stdin);
    let result = match feed {
        Feed::Bytes(bytes) => match sink.write_all(&bytes).await {
            Ok(()) => Ok(bytes.len() as u64),
            Err(e) => Err(HttpError::Io(e)),
        },
        Feed::Multipart(encoder) => encoder.encode(&mut sink).await,
    };
    let closed = sink.shutdown().await;
    drop(sink);
    let sent = result?;
    closed?;
    Ok(sent)
}

async fn read_all<R>(mut reader: R) -> io::Result<Vec<u8>>
where
    R: AsyncRead + Unpin,
{
    let mut buf = Vec::new();
    reader.read_to_end(&mut buf).await?;
    Ok(buf)
}

async fn join(task: JoinHandle<io::Result<Vec<u8>>>) -> Result<Vec<u8>> {
    match task.await {
        Ok(result) => Ok(result?),
        Err(e) => Err(HttpError::Io(io::Error::new(io::ErrorKind::Other, e))),
    }
}

fn take_pipe<T>(pipe: Option<T>, name: &str) -> Result<T> {
    pipe.ok_or_else(|| {
        HttpError::Io(io::Error::new(
            io::ErrorKind::BrokenPipe,
            format!("transport {} not captured", name),
        ))
    })
}

fn spawn_error(program: &Path, source: io::Error) -> HttpError {
    HttpError::Spawn {
        program: program.to_path_buf(),
        source,
    }
}

fn check_exit(status: ExitStatus, stderr: &[u8]) -> Result<()> {
    log::debug!("transport exited: {}", status);
    if status.success() {
        return Ok(());
    }
    Err(HttpError::ProcessFailed {
        code: status.code(),
        stderr: String::from_utf8_lossy(stderr).trim().to_string(),
    })
}
