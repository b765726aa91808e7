use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use crate::error::AppResult;

// =========================================================
// 抽象接口定义
// =========================================================

/// 持久化键值存储（浏览器中为 localStorage）
///
/// 值按原样的字符串保存：令牌是裸字符串，用户资料是 JSON 文本。
pub trait StorageAdapter: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str) -> AppResult<()>;
    fn remove(&self, key: &str);
}

// =========================================================
// 生产环境实现 (BrowserStorage)
// =========================================================

#[cfg(target_arch = "wasm32")]
#[derive(Clone, Copy, Default)]
pub struct BrowserStorage;

#[cfg(target_arch = "wasm32")]
impl StorageAdapter for BrowserStorage {
    fn get(&self, key: &str) -> Option<String> {
        use gloo_storage::Storage;
        gloo_storage::LocalStorage::raw().get_item(key).ok().flatten()
    }

    fn set(&self, key: &str, value: &str) -> AppResult<()> {
        use crate::error::AppError;
        use gloo_storage::Storage;
        gloo_storage::LocalStorage::raw()
            .set_item(key, value)
            .map_err(|e| {
                let msg = e.as_string().unwrap_or_else(|| format!("{:?}", e));
                AppError::storage(msg).in_op_with("storage.set", key)
            })
    }

    fn remove(&self, key: &str) {
        use gloo_storage::Storage;
        gloo_storage::LocalStorage::delete(key);
    }
}

// =========================================================
// 内存实现 (MemoryStorage)
// =========================================================

/// 进程内存储：原生环境的默认实现，也用于测试
#[derive(Default)]
pub struct MemoryStorage {
    map: Mutex<HashMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, String>> {
        self.map.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl StorageAdapter for MemoryStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.lock().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> AppResult<()> {
        self.lock().insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) {
        self.lock().remove(key);
    }
}

/// 当前平台的默认存储
#[cfg(target_arch = "wasm32")]
pub fn default_storage() -> Arc<dyn StorageAdapter> {
    Arc::new(BrowserStorage)
}

#[cfg(not(target_arch = "wasm32"))]
pub fn default_storage() -> Arc<dyn StorageAdapter> {
    Arc::new(MemoryStorage::new())
}
