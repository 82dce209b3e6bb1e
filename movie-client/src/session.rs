//! Хранилище сессии: пара ключей `user`/`token` поверх key/value-хранилища.
//!
//! `KeyValueStore` повторяет контракт браузерного localStorage, а
//! `SessionContext` это явный объект сессии, который передаётся во все view.

use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use tracing::{error, warn};

use crate::error::{MovieClientError, MovieClientResult};
use crate::models::User;

/// Ключ, под которым лежит JSON пользователя.
pub const USER_KEY: &str = "user";
/// Ключ, под которым лежит bearer-токен.
pub const TOKEN_KEY: &str = "token";

/// Строковое key/value-хранилище в духе localStorage.
pub trait KeyValueStore: Send + Sync {
    /// Возвращает значение по ключу, если оно есть.
    fn get_item(&self, key: &str) -> Option<String>;
    /// Записывает значение.
    fn set_item(&self, key: &str, value: &str) -> MovieClientResult<()>;
    /// Удаляет ключ. Отсутствующий ключ не считается ошибкой.
    fn remove_item(&self, key: &str) -> MovieClientResult<()>;
}

#[derive(Debug, Default)]
/// Хранилище в памяти процесса.
pub struct MemoryStorage {
    items: Mutex<HashMap<String, String>>,
}

impl MemoryStorage {
    /// Создаёт пустое хранилище.
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStorage {
    fn get_item(&self, key: &str) -> Option<String> {
        self.items.lock().ok()?.get(key).cloned()
    }

    fn set_item(&self, key: &str, value: &str) -> MovieClientResult<()> {
        self.items
            .lock()
            .map_err(|_| MovieClientError::Storage("memory storage lock poisoned".to_string()))?
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&self, key: &str) -> MovieClientResult<()> {
        self.items
            .lock()
            .map_err(|_| MovieClientError::Storage("memory storage lock poisoned".to_string()))?
            .remove(key);
        Ok(())
    }
}

#[derive(Debug)]
/// Хранилище в JSON-файле: один объект `{ключ: значение}`.
///
/// Файл перечитывается при каждом обращении, поэтому несколько запусков CLI
/// видят одну и ту же сессию.
pub struct FileStorage {
    path: PathBuf,
    lock: Mutex<()>,
}

impl FileStorage {
    /// Создаёт хранилище поверх файла. Сам файл создаётся при первой записи.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    /// Путь к файлу хранилища.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_items(&self) -> MovieClientResult<BTreeMap<String, String>> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(BTreeMap::new()),
            Err(err) => return Err(MovieClientError::Storage(err.to_string())),
        };
        if raw.trim().is_empty() {
            return Ok(BTreeMap::new());
        }

        // битый файл не должен блокировать вход и выход
        match serde_json::from_str(&raw) {
            Ok(items) => Ok(items),
            Err(err) => {
                warn!(
                    error = %err,
                    path = %self.path.display(),
                    "corrupted session file, starting empty"
                );
                Ok(BTreeMap::new())
            }
        }
    }

    fn temp_path(&self) -> PathBuf {
        let mut raw = self.path.clone().into_os_string();
        raw.push(".tmp");
        PathBuf::from(raw)
    }

    /// Пишет во временный файл и переименовывает его поверх основного.
    fn write_items(&self, items: &BTreeMap<String, String>) -> MovieClientResult<()> {
        let raw = serde_json::to_string_pretty(items)
            .map_err(|err| MovieClientError::Storage(err.to_string()))?;
        let tmp = self.temp_path();
        fs::write(&tmp, raw).map_err(|err| MovieClientError::Storage(err.to_string()))?;
        fs::rename(&tmp, &self.path).map_err(|err| {
            let _ = fs::remove_file(&tmp);
            MovieClientError::Storage(err.to_string())
        })
    }

    fn modify(&self, f: impl FnOnce(&mut BTreeMap<String, String>)) -> MovieClientResult<()> {
        let _guard = self
            .lock
            .lock()
            .map_err(|_| MovieClientError::Storage("file storage lock poisoned".to_string()))?;
        let mut items = self.read_items()?;
        f(&mut items);
        self.write_items(&items)
    }
}

impl KeyValueStore for FileStorage {
    fn get_item(&self, key: &str) -> Option<String> {
        match self.read_items() {
            Ok(mut items) => items.remove(key),
            Err(err) => {
                warn!(error = %err, "failed to read session file");
                None
            }
        }
    }

    fn set_item(&self, key: &str, value: &str) -> MovieClientResult<()> {
        self.modify(|items| {
            items.insert(key.to_string(), value.to_string());
        })
    }

    fn remove_item(&self, key: &str) -> MovieClientResult<()> {
        self.modify(|items| {
            items.remove(key);
        })
    }
}

fn parse_token(raw: &str) -> Option<String> {
    let token = raw.trim().to_string();
    if token.is_empty() {
        return None;
    }
    Some(token)
}

fn parse_user(raw: &str) -> Option<User> {
    serde_json::from_str::<User>(raw).ok()
}

#[derive(Clone)]
/// Явный контекст сессии, который получает каждое view.
pub struct SessionContext {
    store: Arc<dyn KeyValueStore>,
}

impl std::fmt::Debug for SessionContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionContext")
            .field("authenticated", &self.token().is_some())
            .finish()
    }
}

impl SessionContext {
    /// Оборачивает хранилище.
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// Снимок пользователя из сессии. Невалидный JSON считается отсутствием.
    pub fn user(&self) -> Option<User> {
        let raw = self.store.get_item(USER_KEY)?;
        parse_user(&raw)
    }

    /// Логин текущего пользователя.
    pub fn username(&self) -> Option<String> {
        self.user()
            .map(|user| user.username)
            .filter(|username| !username.trim().is_empty())
    }

    /// Bearer-токен. Пустая строка считается отсутствием токена.
    pub fn token(&self) -> Option<String> {
        let raw = self.store.get_item(TOKEN_KEY)?;
        parse_token(&raw)
    }

    /// Есть ли токен. Валидность не проверяется.
    pub fn is_authenticated(&self) -> bool {
        self.token().is_some()
    }

    /// Сохраняет пользователя и токен после успешного входа.
    pub fn set_session(&self, user: &User, token: &str) -> MovieClientResult<()> {
        self.update_user(user)?;
        self.store.set_item(TOKEN_KEY, token)
    }

    /// Перезаписывает только снимок пользователя.
    pub fn update_user(&self, user: &User) -> MovieClientResult<()> {
        let raw = serde_json::to_string(user)
            .map_err(|err| MovieClientError::Storage(format!("failed to serialize user: {err}")))?;
        self.store.set_item(USER_KEY, &raw)
    }

    /// Удаляет только токен (так делает logout).
    pub fn clear_token(&self) -> MovieClientResult<()> {
        self.store.remove_item(TOKEN_KEY)
    }

    /// Удаляет оба ключа.
    pub fn clear(&self) -> MovieClientResult<()> {
        self.store.remove_item(TOKEN_KEY)?;
        self.store.remove_item(USER_KEY)
    }

    /// Логин для операций, которым он обязателен.
    ///
    /// Если пользователя нет, пишет ошибку в лог и возвращает `None`:
    /// вызывающий код молча выходит без запросов и без изменения состояния.
    pub(crate) fn require_username(&self, operation: &str) -> Option<String> {
        let username = self.username();
        if username.is_none() {
            error!(operation, "no user in session, skipping");
        }
        username
    }
}
