#![allow(dead_code)]

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;
use vibe_uigen::provider::Provider;

/// Canned completion service that records what it was asked.
pub struct StubProvider {
    reply: Option<String>,
    pub calls: Arc<AtomicUsize>,
    pub prompts: Arc<Mutex<Vec<String>>>,
}

impl StubProvider {
    pub fn replying(reply: &str) -> Self {
        Self {
            reply: Some(reply.to_string()),
            calls: Arc::new(AtomicUsize::new(0)),
            prompts: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn failing() -> Self {
        Self {
            reply: None,
            calls: Arc::new(AtomicUsize::new(0)),
            prompts: Arc::new(Mutex::new(Vec::new())),
        }
    }
}

#[async_trait]
impl Provider for StubProvider {
    async fn complete(&self, prompt: &str, _debug: bool) -> Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.prompts.lock().push(prompt.to_string());
        self.reply.clone().ok_or_else(|| anyhow!("upstream returned 503"))
    }
}

pub const NAVBAR_REPLY: &str = r##"Here is your navigation bar.

```html
<nav class="flex items-center justify-between p-4">
  <img src="https://example.com/logo.png" alt="Logo">
  <ul class="flex gap-4"><li><a href="#home">Home</a></li></ul>
</nav>
```

```css
nav { position: sticky; top: 0; }
```

```javascript
document.querySelector('nav').classList.add('ready');
```
"##;

/// Never answers within a test's lifetime; counts the calls it started.
pub struct StalledProvider {
    pub calls: Arc<AtomicUsize>,
}

impl StalledProvider {
    pub fn new() -> Self {
        Self { calls: Arc::new(AtomicUsize::new(0)) }
    }
}

#[async_trait]
impl Provider for StalledProvider {
    async fn complete(&self, _prompt: &str, _debug: bool) -> Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        tokio::time::sleep(std::time::Duration::from_secs(60)).await;
        Ok(String::new())
    }
}
