use std::collections::VecDeque;
use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex};

use barfeed::errors::Result;
use barfeed::exec::SingleRunner;

/// A fake `SingleRunner` that:
/// - records which commands were run
/// - answers with queued outputs, repeating the last one when the queue runs
///   dry (or echoing the command when nothing was queued).
#[derive(Clone, Default)]
pub struct ScriptedRunner {
    outputs: Arc<Mutex<VecDeque<String>>>,
    last: Arc<Mutex<Option<String>>>,
    calls: Arc<Mutex<Vec<String>>>,
}

impl ScriptedRunner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_outputs(outputs: &[&str]) -> Self {
        let runner = Self::default();
        runner
            .outputs
            .lock()
            .unwrap()
            .extend(outputs.iter().map(|s| s.to_string()));
        runner
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

impl SingleRunner for ScriptedRunner {
    fn run<'a>(
        &'a mut self,
        cmd: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<String>> + Send + 'a>> {
        let outputs = Arc::clone(&self.outputs);
        let last = Arc::clone(&self.last);
        let calls = Arc::clone(&self.calls);

        Box::pin(async move {
            calls.lock().unwrap().push(cmd.to_string());

            let next = outputs.lock().unwrap().pop_front();
            let mut last = last.lock().unwrap();
            let out = match next {
                Some(out) => out,
                None => last.clone().unwrap_or_else(|| cmd.to_string()),
            };
            *last = Some(out.clone());
            Ok(out)
        })
    }
}
