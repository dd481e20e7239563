use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex};

use barfeed::errors::Result;
use barfeed::sink::StatusSink;

/// A sink that records every published line (newline included).
#[derive(Clone, Default)]
pub struct RecordingSink {
    lines: Arc<Mutex<Vec<String>>>,
    shut_down: Arc<Mutex<bool>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lines(&self) -> Vec<String> {
        self.lines.lock().unwrap().clone()
    }

    pub fn is_shut_down(&self) -> bool {
        *self.shut_down.lock().unwrap()
    }
}

impl StatusSink for RecordingSink {
    fn publish<'a>(
        &'a mut self,
        line: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<()>> + Send + 'a>> {
        let lines = Arc::clone(&self.lines);
        Box::pin(async move {
            lines.lock().unwrap().push(line.to_string());
            Ok(())
        })
    }

    fn shutdown(&mut self) -> Pin<Box<dyn Future<Output = ()> + Send + '_>> {
        let flag = Arc::clone(&self.shut_down);
        Box::pin(async move {
            *flag.lock().unwrap() = true;
        })
    }
}
