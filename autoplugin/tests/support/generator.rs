//! テスト用の説明文生成器

use async_trait::async_trait;
use autoplugin::{Availability, DescriptionGenerator, PluginResult};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// 固定の応答を返し、呼び出しを記録する生成器
#[derive(Default)]
pub struct RecordingGenerator {
    reply: String,
    calls: AtomicUsize,
    requests: Mutex<Vec<(String, String)>>,
}

#[allow(dead_code)]
impl RecordingGenerator {
    pub fn new(reply: &str) -> Arc<Self> {
        Arc::new(Self {
            reply: reply.to_string(),
            ..Self::default()
        })
    }

    /// generate の呼び出し回数
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// 受け取った (関数名, ソーステキスト)
    pub fn requests(&self) -> Vec<(String, String)> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl DescriptionGenerator for RecordingGenerator {
    fn name(&self) -> &str {
        "recording"
    }

    fn availability(&self) -> Availability {
        Availability::Available
    }

    async fn generate(&self, function_name: &str, source_text: &str) -> PluginResult<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.requests
            .lock()
            .unwrap()
            .push((function_name.to_string(), source_text.to_string()));
        Ok(self.reply.clone())
    }
}
