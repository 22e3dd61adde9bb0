use serde::Deserialize;
use tracing::{debug, warn};

#[derive(Debug, Deserialize)]
struct GenerateEvent {
    #[serde(default)]
    response: String,
    #[serde(default)]
    done: bool,
    #[serde(default)]
    error: Option<String>,
}

#[derive(Debug, Default)]
pub struct StreamAssembler {
    pending: Vec<u8>,
    text: String,
    skipped: usize,
    done: bool,
}

impl StreamAssembler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, bytes: &[u8]) {
        self.pending.extend_from_slice(bytes);

        while let Some(newline) = self.pending.iter().position(|byte| *byte == b'\n') {
            let line = self.pending.drain(..=newline).collect::<Vec<_>>();
            self.accept_line(&line[..newline]);
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn skipped(&self) -> usize {
        self.skipped
    }

    pub fn is_done(&self) -> bool {
        self.done
    }

    pub fn flush(&mut self) {
        let rest = std::mem::take(&mut self.pending);
        self.accept_line(&rest);
    }

    pub fn finish(mut self) -> String {
        self.flush();
        self.text
    }

    fn accept_line(&mut self, line: &[u8]) {
        let line = line.trim_ascii();
        if line.is_empty() {
            return;
        }

        match serde_json::from_slice::<GenerateEvent>(line) {
            Ok(event) => {
                if let Some(error) = event.error.as_deref() {
                    warn!(error = %error, "generative backend reported an error event");
                }
                self.text.push_str(&event.response);
                self.done |= event.done;
            }
            Err(err) => {
                self.skipped += 1;
                debug!(error = %err, bytes = line.len(), "skipping undecodable stream fragment");
            }
        }
    }
}
