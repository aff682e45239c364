//! JSON persistence: one document per user profile, plus the session record
//! and the plaintext user directory.

use std::{
    env,
    fs::{self, File},
    io::Write,
    path::{Path, PathBuf},
};

use chrono::{DateTime, NaiveDateTime, Utc};

use crate::domain::{Plan, User};
use crate::errors::{PlanError, Result};
use crate::storage::migrate::{plan_warnings, upgrade_plan_document, LoadReport};
use crate::storage::StorageBackend;

const DEFAULT_DIR_NAME: &str = ".kwanza_plan";
const PROFILES_DIR: &str = "profiles";
const BACKUPS_DIR: &str = "backups";
const SESSION_FILE: &str = "session.json";
const USERS_FILE: &str = "users.json";
const BACKUP_EXTENSION: &str = "json";
const BACKUP_TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";
const TMP_SUFFIX: &str = "tmp";
const DEFAULT_RETENTION: usize = 5;

/// Returns the application data directory, defaulting to `~/.kwanza_plan`
/// with a `KWANZA_PLAN_HOME` override.
pub fn app_data_dir() -> PathBuf {
    if let Some(custom) = env::var_os("KWANZA_PLAN_HOME") {
        return PathBuf::from(custom);
    }
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(DEFAULT_DIR_NAME)
}

#[derive(Clone)]
pub struct JsonStorage {
    profiles_dir: PathBuf,
    backups_dir: PathBuf,
    session_file: PathBuf,
    users_file: PathBuf,
    retention: usize,
}

impl JsonStorage {
    pub fn new(root: Option<PathBuf>, retention: Option<usize>) -> Result<Self> {
        let root = root.unwrap_or_else(app_data_dir);
        let profiles_dir = root.join(PROFILES_DIR);
        let backups_dir = root.join(BACKUPS_DIR);
        ensure_dir(&root)?;
        ensure_dir(&profiles_dir)?;
        ensure_dir(&backups_dir)?;
        Ok(Self {
            profiles_dir,
            backups_dir,
            session_file: root.join(SESSION_FILE),
            users_file: root.join(USERS_FILE),
            retention: retention.unwrap_or(DEFAULT_RETENTION).max(1),
        })
    }

    pub fn new_default() -> Result<Self> {
        Self::new(None, None)
    }

    pub fn profile_path(&self, user: &User) -> PathBuf {
        self.profiles_dir.join(format!("{}.json", user.id))
    }

    fn backup_dir(&self, user: &User) -> PathBuf {
        self.backups_dir.join(user.id.to_string())
    }

    pub fn backup_path(&self, user: &User, backup_name: &str) -> PathBuf {
        self.backup_dir(user).join(backup_name)
    }

    // ---- session -----------------------------------------------------

    /// Records the logged-in user. `None` clears the session.
    pub fn record_session(&self, user: Option<&User>) -> Result<()> {
        match user {
            Some(user) => {
                let json = serde_json::to_string_pretty(user)?;
                write_atomic(&self.session_file, &json)
            }
            None => {
                if self.session_file.exists() {
                    fs::remove_file(&self.session_file)?;
                }
                Ok(())
            }
        }
    }

    pub fn current_session(&self) -> Result<Option<User>> {
        if !self.session_file.exists() {
            return Ok(None);
        }
        let data = fs::read_to_string(&self.session_file)?;
        Ok(Some(serde_json::from_str(&data)?))
    }

    // ---- user directory ----------------------------------------------

    pub fn list_users(&self) -> Result<Vec<User>> {
        if !self.users_file.exists() {
            return Ok(Vec::new());
        }
        let data = fs::read_to_string(&self.users_file)?;
        Ok(serde_json::from_str(&data)?)
    }

    pub fn find_user(&self, email: &str) -> Result<Option<User>> {
        let needle = email.trim().to_ascii_lowercase();
        Ok(self
            .list_users()?
            .into_iter()
            .find(|user| user.email == needle))
    }

    /// Looks a user up by email, registering them when unknown. There is no
    /// password verification; the directory is a local plaintext lookup.
    pub fn login_or_register(&self, name: &str, email: &str) -> Result<User> {
        if let Some(existing) = self.find_user(email)? {
            return Ok(existing);
        }
        let display_name = if name.trim().is_empty() {
            email.split('@').next().unwrap_or(email).to_string()
        } else {
            name.trim().to_string()
        };
        let user = User::new(display_name, email);
        let mut users = self.list_users()?;
        users.push(user.clone());
        let json = serde_json::to_string_pretty(&users)?;
        write_atomic(&self.users_file, &json)?;
        tracing::info!(email = %user.email, "registered new user");
        Ok(user)
    }

    // ---- backups -----------------------------------------------------

    fn write_backup_file(&self, plan: &Plan, note: Option<&str>) -> Result<()> {
        let dir = self.backup_dir(&plan.owner);
        ensure_dir(&dir)?;
        let timestamp = Utc::now().format(BACKUP_TIMESTAMP_FORMAT).to_string();
        let mut file_stem = format!("plan_{}", timestamp);
        if let Some(label) = sanitize_backup_note(note) {
            file_stem.push('_');
            file_stem.push_str(&label);
        }
        // Timestamps are second-granular; suffix on collision rather than
        // overwriting an earlier backup from the same second.
        let mut path = dir.join(format!("{}.{}", file_stem, BACKUP_EXTENSION));
        let mut attempt = 1;
        while path.exists() {
            attempt += 1;
            path = dir.join(format!("{}_{}.{}", file_stem, attempt, BACKUP_EXTENSION));
        }
        let json = serde_json::to_string_pretty(plan)?;
        write_atomic(&path, &json)?;
        self.prune_backups(&plan.owner)?;
        Ok(())
    }

    fn prune_backups(&self, user: &User) -> Result<()> {
        let backups = StorageBackend::list_backups(self, user)?;
        if backups.len() <= self.retention {
            return Ok(());
        }
        for entry in backups.iter().skip(self.retention) {
            let path = self.backup_path(user, entry);
            let _ = fs::remove_file(path);
        }
        Ok(())
    }
}

impl StorageBackend for JsonStorage {
    fn save(&self, plan: &Plan) -> Result<()> {
        save_json_atomic(&self.profile_path(&plan.owner), plan)
    }

    fn load(&self, user: &User) -> Result<LoadReport> {
        let path = self.profile_path(user);
        load_plan_from_path(&path)
    }

    fn exists(&self, user: &User) -> bool {
        self.profile_path(user).exists()
    }

    fn backup(&self, plan: &Plan, note: Option<&str>) -> Result<()> {
        self.write_backup_file(plan, note)
    }

    fn list_backups(&self, user: &User) -> Result<Vec<String>> {
        let dir = self.backup_dir(user);
        if !dir.exists() {
            return Ok(Vec::new());
        }
        let mut entries = Vec::new();
        for entry in fs::read_dir(dir)? {
            let entry = entry?;
            let path = entry.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some(BACKUP_EXTENSION) {
                continue;
            }
            if let Some(name) = path.file_name().and_then(|name| name.to_str()) {
                entries.push(name.to_string());
            }
        }
        entries.sort_by(|a, b| parse_backup_timestamp(b).cmp(&parse_backup_timestamp(a)));
        Ok(entries)
    }

    fn restore(&self, user: &User, backup_name: &str) -> Result<LoadReport> {
        let backup_path = self.backup_path(user, backup_name);
        if !backup_path.exists() {
            return Err(PlanError::Storage(format!(
                "backup `{}` not found",
                backup_name
            )));
        }
        let target = self.profile_path(user);
        fs::copy(&backup_path, &target)?;
        load_plan_from_path(&target)
    }
}

/// Reads a plan document, running the migration chain and collecting
/// referential warnings.
pub fn load_plan_from_path(path: &Path) -> Result<LoadReport> {
    if !path.exists() {
        return Err(PlanError::Storage(format!(
            "plan file `{}` not found",
            path.display()
        )));
    }
    let data = fs::read_to_string(path)?;
    let doc: serde_json::Value = serde_json::from_str(&data)?;
    let (plan, migrations, loaded_version) = upgrade_plan_document(doc)?;
    let warnings = plan_warnings(&plan);
    for note in &migrations {
        tracing::info!(%note, "plan schema migrated");
    }
    Ok(LoadReport {
        plan,
        migrations,
        warnings,
        loaded_version,
    })
}

pub fn save_plan_to_path(plan: &Plan, path: &Path) -> Result<()> {
    save_json_atomic(path, plan)
}

/// Serializes a value as pretty JSON and moves it into place atomically.
pub fn save_json_atomic<T: serde::Serialize>(path: &Path, value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    let tmp = tmp_path(path);
    write_atomic(&tmp, &json)?;
    fs::rename(&tmp, path)?;
    Ok(())
}

fn ensure_dir(path: &Path) -> Result<()> {
    if !path.exists() {
        fs::create_dir_all(path)?;
    }
    Ok(())
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut tmp = path.to_path_buf();
    let ext = match path.extension().and_then(|ext| ext.to_str()) {
        Some(existing) => format!("{}.{}", existing, TMP_SUFFIX),
        None => TMP_SUFFIX.to_string(),
    };
    tmp.set_extension(ext);
    tmp
}

fn write_atomic(path: &Path, data: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        ensure_dir(parent)?;
    }
    let mut file = File::create(path)?;
    file.write_all(data.as_bytes())?;
    file.flush()?;
    Ok(())
}

fn sanitize_backup_note(note: Option<&str>) -> Option<String> {
    let raw = note?.trim();
    if raw.is_empty() {
        return None;
    }
    let mut sanitized = String::new();
    let mut last_dash = false;
    for ch in raw.chars() {
        if ch.is_ascii_alphanumeric() {
            sanitized.push(ch.to_ascii_lowercase());
            last_dash = false;
        } else if ch.is_whitespace() || matches!(ch, '-' | '.') {
            if !sanitized.is_empty() && !last_dash {
                sanitized.push('-');
                last_dash = true;
            }
        }
    }
    let trimmed = sanitized.trim_matches('-').to_string();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed)
    }
}

fn parse_backup_timestamp(name: &str) -> Option<DateTime<Utc>> {
    // plan_YYYYmmdd_HHMMSS[_note].json
    let stem = name.strip_suffix(".json")?;
    let rest = stem.strip_prefix("plan_")?;
    let raw: String = rest
        .split('_')
        .take(2)
        .collect::<Vec<_>>()
        .join("_");
    NaiveDateTime::parse_from_str(&raw, BACKUP_TIMESTAMP_FORMAT)
        .ok()
        .map(|naive| DateTime::from_naive_utc_and_offset(naive, Utc))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn storage_with_temp_dir() -> (JsonStorage, TempDir) {
        let temp = TempDir::new().expect("temp dir");
        let storage =
            JsonStorage::new(Some(temp.path().to_path_buf()), Some(3)).expect("json storage");
        (storage, temp)
    }

    fn sample_plan(storage: &JsonStorage) -> Plan {
        let user = storage
            .login_or_register("Sample", "sample@example.com")
            .expect("register");
        Plan::new(user)
    }

    #[test]
    fn save_and_load_roundtrip() {
        let (storage, _guard) = storage_with_temp_dir();
        let plan = sample_plan(&storage);
        storage.save(&plan).expect("save plan");
        let report = storage.load(&plan.owner).expect("load plan");
        assert_eq!(report.plan.owner, plan.owner);
        assert!(report.migrations.is_empty());
        assert!(report.warnings.is_empty());
    }

    #[test]
    fn backup_writes_timestamped_files() {
        let (storage, _guard) = storage_with_temp_dir();
        let plan = sample_plan(&storage);
        storage.save(&plan).expect("save plan");
        storage.backup(&plan, Some("monthly")).expect("backup");
        let backups = storage.list_backups(&plan.owner).expect("list backups");
        assert!(!backups.is_empty());
        assert!(backups[0].starts_with("plan_"));
        assert!(backups[0].ends_with("_monthly.json"));
    }

    #[test]
    fn same_second_backups_are_kept_apart() {
        let (storage, _guard) = storage_with_temp_dir();
        let plan = sample_plan(&storage);
        storage.save(&plan).expect("save plan");
        storage.backup(&plan, Some("monthly")).expect("first backup");
        storage.backup(&plan, Some("monthly")).expect("second backup");
        let backups = storage.list_backups(&plan.owner).expect("list backups");
        assert_eq!(backups.len(), 2);
    }

    #[test]
    fn session_roundtrip_and_clear() {
        let (storage, _guard) = storage_with_temp_dir();
        let plan = sample_plan(&storage);
        storage.record_session(Some(&plan.owner)).expect("record");
        assert_eq!(storage.current_session().unwrap(), Some(plan.owner.clone()));
        storage.record_session(None).expect("clear");
        assert_eq!(storage.current_session().unwrap(), None);
    }

    #[test]
    fn login_is_idempotent_per_email() {
        let (storage, _guard) = storage_with_temp_dir();
        let first = storage
            .login_or_register("Maria", "maria@example.com")
            .unwrap();
        let second = storage
            .login_or_register("", "MARIA@example.com")
            .unwrap();
        assert_eq!(first.id, second.id);
        assert_eq!(storage.list_users().unwrap().len(), 1);
    }
}
