//! Shared helpers for client integration tests

#![allow(dead_code)]

use medibuddy_client::platform::DetachedTask;
use medibuddy_client::{ApiClient, Platform};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::task::JoinHandle;

/// Interactive platform that records navigation and runs detached tasks on tokio
#[derive(Default)]
pub struct RecordingPlatform {
    current_path: Option<String>,
    navigations: Mutex<Vec<String>>,
    reloads: AtomicUsize,
    tasks: Mutex<Vec<JoinHandle<()>>>,
}

impl RecordingPlatform {
    pub fn at(path: &str) -> Arc<Self> {
        Arc::new(Self {
            current_path: Some(path.to_string()),
            ..Self::default()
        })
    }

    pub fn navigations(&self) -> Vec<String> {
        self.navigations.lock().unwrap().clone()
    }

    pub fn reloads(&self) -> usize {
        self.reloads.load(Ordering::SeqCst)
    }

    /// Wait for every detached task spawned so far
    pub async fn drain_tasks(&self) {
        let handles: Vec<_> = self.tasks.lock().unwrap().drain(..).collect();
        for handle in handles {
            handle.await.unwrap();
        }
    }
}

impl Platform for RecordingPlatform {
    fn is_interactive(&self) -> bool {
        true
    }

    fn current_path(&self) -> Option<String> {
        self.current_path.clone()
    }

    fn navigate(&self, path: &str) {
        self.navigations.lock().unwrap().push(path.to_string());
    }

    fn reload(&self) {
        self.reloads.fetch_add(1, Ordering::SeqCst);
    }

    fn spawn_detached(&self, task: DetachedTask) {
        let handle = tokio::spawn(task);
        self.tasks.lock().unwrap().push(handle);
    }
}

/// Client against `base_url` on a recording platform sitting at `/medicines`
pub fn client_for(base_url: &str) -> (ApiClient, Arc<RecordingPlatform>) {
    let platform = RecordingPlatform::at("/medicines");
    let client = ApiClient::builder()
        .base_url(base_url)
        .platform(platform.clone())
        .build()
        .unwrap();
    (client, platform)
}
