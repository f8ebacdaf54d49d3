//! Shared mock backend for router integration tests.
#![allow(dead_code)]

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::time::Instant;
use vasari_core::{ChatMessage, ChatRequest, ChatResponse, CostTable, TokenUsage};
use vasari_error::{BackendError, BackendErrorKind, VasariResult};
use vasari_interface::{ChunkStream, FinishReason, StreamChunk, Streaming, VasariDriver};

type CompletionScript = Result<ChatResponse, BackendErrorKind>;
type StreamScript = Result<Vec<Result<StreamChunk, BackendErrorKind>>, BackendErrorKind>;

/// A backend that replays a scripted sequence of responses and records
/// when it was called. Scripts are consumed front to back; an
/// unscripted call is a test bug and panics.
pub struct MockBackend {
    name: String,
    completions: Mutex<VecDeque<CompletionScript>>,
    streams: Mutex<VecDeque<StreamScript>>,
    calls: AtomicUsize,
    call_times: Mutex<Vec<Instant>>,
}

impl MockBackend {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            completions: Mutex::new(VecDeque::new()),
            streams: Mutex::new(VecDeque::new()),
            calls: AtomicUsize::new(0),
            call_times: Mutex::new(Vec::new()),
        }
    }

    pub fn succeed_with(self, content: &str, usage: TokenUsage) -> Self {
        self.completions.lock().unwrap().push_back(Ok(ChatResponse {
            message: ChatMessage::assistant(content),
            usage,
        }));
        self
    }

    pub fn respond_with(self, response: ChatResponse) -> Self {
        self.completions.lock().unwrap().push_back(Ok(response));
        self
    }

    pub fn fail_with(self, kind: BackendErrorKind) -> Self {
        self.completions.lock().unwrap().push_back(Err(kind));
        self
    }

    pub fn stream_with(self, items: Vec<Result<StreamChunk, BackendErrorKind>>) -> Self {
        self.streams.lock().unwrap().push_back(Ok(items));
        self
    }

    pub fn fail_stream_open(self, kind: BackendErrorKind) -> Self {
        self.streams.lock().unwrap().push_back(Err(kind));
        self
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn call_times(&self) -> Vec<Instant> {
        self.call_times.lock().unwrap().clone()
    }

    fn record_call(&self) {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.call_times.lock().unwrap().push(Instant::now());
    }
}

#[async_trait]
impl VasariDriver for MockBackend {
    async fn complete(&self, _req: &ChatRequest) -> VasariResult<ChatResponse> {
        self.record_call();
        match self.completions.lock().unwrap().pop_front() {
            Some(Ok(response)) => Ok(response),
            Some(Err(kind)) => Err(BackendError::new(kind).into()),
            None => panic!("unscripted completion call on mock backend {}", self.name),
        }
    }

    fn provider_name(&self) -> &'static str {
        "mock"
    }

    fn model_name(&self) -> &str {
        &self.name
    }
}

#[async_trait]
impl Streaming for MockBackend {
    async fn complete_stream(&self, _req: &ChatRequest) -> VasariResult<ChunkStream> {
        self.record_call();
        match self.streams.lock().unwrap().pop_front() {
            Some(Ok(items)) => {
                let items: Vec<VasariResult<StreamChunk>> = items
                    .into_iter()
                    .map(|item| item.map_err(|kind| BackendError::new(kind).into()))
                    .collect();
                Ok(Box::pin(futures_util::stream::iter(items)))
            }
            Some(Err(kind)) => Err(BackendError::new(kind).into()),
            None => panic!("unscripted streaming call on mock backend {}", self.name),
        }
    }
}

pub fn request() -> ChatRequest {
    ChatRequest::new(vec![ChatMessage::user("ping")])
}

pub fn usage(input: u64, output: u64) -> TokenUsage {
    TokenUsage {
        input_tokens: input,
        output_tokens: output,
        cached_input_tokens: 0,
    }
}

pub fn delta(text: &str) -> Result<StreamChunk, BackendErrorKind> {
    Ok(StreamChunk {
        delta: text.to_string(),
        ..Default::default()
    })
}

pub fn finish(usage: Option<TokenUsage>) -> Result<StreamChunk, BackendErrorKind> {
    Ok(StreamChunk {
        usage,
        finish_reason: Some(FinishReason::Stop),
        ..Default::default()
    })
}

pub fn cost_table(input_per_1k: f64, output_per_1k: f64) -> CostTable {
    CostTable {
        input_per_1k,
        output_per_1k,
        currency: "USD".to_string(),
    }
}
