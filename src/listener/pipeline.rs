use crate::buffer::HistoryBuffer;
use crate::domain::{DispatchOutcome, RawLine};
use crate::parser::{LogFieldExtractor, RegexError};
use crate::sender::{Dispatcher, QuarantineApi};
use std::sync::Arc;
use tracing::{debug, info};

/// Per-line processing shared by every listener: log, record, extract, dispatch.
#[derive(Debug)]
pub struct LinePipeline<C> {
    history: Arc<HistoryBuffer>,
    extractor: LogFieldExtractor,
    dispatcher: Dispatcher<C>,
}

impl<C: QuarantineApi> LinePipeline<C> {
    pub fn new(
        history: Arc<HistoryBuffer>,
        dispatcher: Dispatcher<C>,
    ) -> Result<Self, RegexError> {
        Ok(Self {
            history,
            extractor: LogFieldExtractor::shared()?.clone(),
            dispatcher,
        })
    }

    pub fn history(&self) -> &Arc<HistoryBuffer> {
        &self.history
    }

    pub fn dispatcher(&self) -> &Dispatcher<C> {
        &self.dispatcher
    }

    /// Process one line. Never fails; the outcome is returned only when a
    /// quarantine call was attempted.
    pub async fn process(&self, line: RawLine) -> Option<DispatchOutcome> {
        info!("[{}] {} → {}", line.transport(), line.peer(), line.text());
        self.history.append(line.text());

        let Some(fields) = self.extractor.extract(line.text()) else {
            debug!(transport = %line.transport(), "no alert segment");
            return None;
        };

        self.dispatcher.dispatch(&fields).await
    }
}
