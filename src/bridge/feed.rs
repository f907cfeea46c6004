//! Line-oriented host adapter.
//!
//! Reads host events, one per line:
//!
//! ```text
//! <room>\t<announcer>\t<message>      an announcement to classify
//! /set <key> <value>                  an option change notification
//! ```
//!
//! and writes one JSON object per announcement:
//!
//! ```text
//! {"action":"unchanged"}
//! {"action":"redirect","buffer":"buffer:behold_less","notify_level":"-1"}
//! {"action":"redirect","buffer":"","notify_level":"-1"}      hidden
//! {"action":"redirect","notify_level":"-1"}                  left in place
//! ```
//!
//! Rejected option changes produce `{"action":"error","message":...}`.

use serde::Serialize;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tracing::{debug, warn};

use crate::bridge::orchestrator::Bridge;
use crate::common::error::Result;
use crate::common::messages::{HostAction, IncomingLine, RedirectTarget};
use crate::rules::SetOutcome;

/// Counters reported when the feed ends.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FeedStats {
    pub lines: u64,
    pub redirected: u64,
    pub option_changes: u64,
    pub rejected_options: u64,
}

/// One parsed input line.
#[derive(Debug, PartialEq, Eq)]
enum FeedInput<'a> {
    Blank,
    Set { key: &'a str, value: &'a str },
    Line { room: &'a str, announcer: &'a str, text: &'a str },
    Malformed,
}

fn parse_input(raw: &str) -> FeedInput<'_> {
    let raw = raw.trim_end_matches(['\r', '\n']);
    if raw.trim().is_empty() {
        return FeedInput::Blank;
    }
    if let Some(rest) = raw.strip_prefix("/set ") {
        let rest = rest.trim_start();
        let (key, value) = rest.split_once(' ').unwrap_or((rest, ""));
        return FeedInput::Set { key, value };
    }

    let mut parts = raw.splitn(3, '\t');
    match (parts.next(), parts.next(), parts.next()) {
        (Some(room), Some(announcer), Some(text)) => FeedInput::Line {
            room,
            announcer,
            text,
        },
        _ => FeedInput::Malformed,
    }
}

/// JSON shape of an output line.
#[derive(Debug, Serialize)]
#[serde(tag = "action", rename_all = "snake_case")]
enum WireAction<'a> {
    Unchanged,
    Redirect {
        #[serde(skip_serializing_if = "Option::is_none")]
        buffer: Option<&'a str>,
        notify_level: &'static str,
    },
    Error {
        message: String,
    },
}

impl<'a> From<&'a HostAction> for WireAction<'a> {
    fn from(action: &'a HostAction) -> Self {
        match action {
            HostAction::Unchanged => WireAction::Unchanged,
            HostAction::Redirect {
                target,
                notify_level,
            } => WireAction::Redirect {
                buffer: match target {
                    RedirectTarget::Buffer(id) => Some(id.as_str()),
                    RedirectTarget::Hidden => Some(""),
                    RedirectTarget::InPlace => None,
                },
                notify_level: notify_level.host_value(),
            },
        }
    }
}

async fn write_action<W>(writer: &mut W, action: &WireAction<'_>) -> Result<()>
where
    W: AsyncWrite + Unpin,
{
    let mut encoded = serde_json::to_string(action)?;
    encoded.push('\n');
    writer.write_all(encoded.as_bytes()).await?;
    writer.flush().await?;
    Ok(())
}

/// Process host events until `reader` is exhausted.
pub async fn run_feed<R, W>(bridge: &mut Bridge, mut reader: R, mut writer: W) -> Result<FeedStats>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut stats = FeedStats::default();
    let mut buf = Vec::new();

    loop {
        buf.clear();
        if reader.read_until(b'\n', &mut buf).await? == 0 {
            break;
        }
        // Non-UTF-8 bytes (Latin-1 chatter) are replaced and the line won't parse.
        let raw = String::from_utf8_lossy(&buf);
        match parse_input(&raw) {
            FeedInput::Blank => {}
            FeedInput::Set { key, value } => match bridge.set_option(key, value) {
                Ok(SetOutcome::Applied { version }) => {
                    debug!("Now at config v{}", version);
                    stats.option_changes += 1;
                }
                Ok(SetOutcome::Ignored) => {}
                Err(e) => {
                    stats.rejected_options += 1;
                    let error = WireAction::Error {
                        message: e.to_string(),
                    };
                    write_action(&mut writer, &error).await?;
                }
            },
            FeedInput::Line {
                room,
                announcer,
                text,
            } => {
                stats.lines += 1;
                let action = bridge.handle_line(&IncomingLine::new(room, announcer, text));
                if !action.is_unchanged() {
                    stats.redirected += 1;
                }
                write_action(&mut writer, &WireAction::from(&action)).await?;
            }
            FeedInput::Malformed => {
                warn!("Malformed input line, expected room<TAB>announcer<TAB>message: {:?}", raw);
                stats.lines += 1;
                write_action(&mut writer, &WireAction::Unchanged).await?;
            }
        }
    }

    debug!("Input closed after {} lines", stats.lines);
    Ok(stats)
}
