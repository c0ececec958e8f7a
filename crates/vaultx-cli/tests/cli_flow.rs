use std::path::PathBuf;
use std::process::{Command, Output};

use tempfile::TempDir;

const PIN: &str = "4821";
const MASTER: &str = "CorrectHorse1";
const BACKUP_PASSPHRASE: &str = "backup-passphrase-123";

fn bin() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_vaultx"))
}

/// Isolated XDG dirs with a config that keeps secrets in a file and uses
/// cheap KDF parameters.
struct TestEnv {
    dir: TempDir,
}

impl TestEnv {
    fn new() -> Self {
        let dir = tempfile::tempdir().expect("tempdir");
        let config_dir = dir.path().join("config").join("vaultx");
        std::fs::create_dir_all(&config_dir).expect("create config dir");
        std::fs::write(
            config_dir.join("config.toml"),
            "[security]\nsecret_backend = \"file\"\n\n[kdf]\nmemory_kib = 19456\niterations = 2\nparallelism = 1\n",
        )
        .expect("write config");
        Self { dir }
    }

    fn command(&self, args: &[&str]) -> Command {
        let mut cmd = Command::new(bin());
        cmd.args(args)
            .env("HOME", self.dir.path())
            .env("XDG_CONFIG_HOME", self.dir.path().join("config"))
            .env("XDG_DATA_HOME", self.dir.path().join("data"))
            .env_remove("VAULTX_VAULT")
            .env_remove("VAULTX_CONFIG")
            .env_remove("VAULTX_PIN")
            .env_remove("VAULTX_NEW_PIN")
            .env_remove("VAULTX_BACKUP_PASSPHRASE")
            .env_remove("VAULTX_MASTER_PASSWORD")
            .env_remove("VAULTX_CREDENTIAL_PASSWORD")
            .env_remove("VAULTX_LOG");
        cmd
    }

    fn run(&self, args: &[&str], envs: &[(&str, &str)]) -> Output {
        let mut cmd = self.command(args);
        for (key, value) in envs {
            cmd.env(key, value);
        }
        cmd.output().expect("run vaultx")
    }

    fn vault_path(&self) -> PathBuf {
        self.dir.path().join("data").join("vaultx").join("vault_v1.enc")
    }

    fn secrets_path(&self) -> PathBuf {
        self.dir
            .path()
            .join("config")
            .join("vaultx")
            .join("secrets.json")
    }

    fn init(&self) {
        let init = self.run(&["init", "--phone", "+15550100"], &[("VAULTX_PIN", PIN)]);
        assert!(
            init.status.success(),
            "init failed: {}",
            String::from_utf8_lossy(&init.stderr)
        );
    }

    fn list_json(&self, pin: &str) -> Vec<serde_json::Value> {
        let list = self.run(&["list", "--json"], &[("VAULTX_PIN", pin)]);
        assert!(
            list.status.success(),
            "list failed: {}",
            String::from_utf8_lossy(&list.stderr)
        );
        let value: serde_json::Value = serde_json::from_slice(&list.stdout).expect("list json");
        value.as_array().expect("list array").clone()
    }
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).to_string()
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).to_string()
}

#[test]
fn test_cli_init_add_list_show_remove() {
    let env = TestEnv::new();
    env.init();
    assert!(env.vault_path().exists());

    let add = env.run(
        &["add", "GitHub", "--username", "bob", "--notes", "work account"],
        &[
            ("VAULTX_PIN", PIN),
            ("VAULTX_CREDENTIAL_PASSWORD", "s3cret-pw"),
        ],
    );
    assert!(add.status.success(), "add failed: {}", stderr(&add));
    assert!(stdout(&add).contains("Added GitHub at index 0"));

    let entries = env.list_json(PIN);
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0]["service"], "GitHub");
    assert_eq!(entries[0]["category"], "work");
    assert!(entries[0].get("password").is_none());

    let show = env.run(&["show", "0"], &[("VAULTX_PIN", PIN)]);
    assert!(show.status.success());
    let output = stdout(&show);
    assert!(output.contains("Password: s3cret-pw"));
    assert!(output.contains("Notes: work account"));

    let remove = env.run(&["remove", "0", "--yes"], &[("VAULTX_PIN", PIN)]);
    assert!(remove.status.success(), "remove failed: {}", stderr(&remove));
    assert!(env.list_json(PIN).is_empty());
}

#[test]
fn test_cli_vault_file_is_not_plaintext() {
    let env = TestEnv::new();
    env.init();
    let add = env.run(
        &["add", "Netflix", "-u", "alice"],
        &[
            ("VAULTX_PIN", PIN),
            ("VAULTX_CREDENTIAL_PASSWORD", "PLAINTEXT_MARKER"),
        ],
    );
    assert!(add.status.success());

    let on_disk = std::fs::read_to_string(env.vault_path()).expect("read vault");
    assert!(!on_disk.contains("PLAINTEXT_MARKER"));
    assert!(!on_disk.contains("Netflix"));
}

#[test]
fn test_cli_wrong_pin_exit_code() {
    let env = TestEnv::new();
    env.init();

    let list = env.run(&["list"], &[("VAULTX_PIN", "9999")]);
    assert_eq!(list.status.code(), Some(5));
    assert!(stderr(&list).contains("Incorrect PIN."));
}

#[test]
fn test_cli_missing_vault_exit_code() {
    let env = TestEnv::new();

    let list = env.run(&["list"], &[("VAULTX_PIN", PIN)]);
    assert_eq!(list.status.code(), Some(3));
    assert!(stderr(&list).contains("No vault found at"));
    assert!(stderr(&list).contains("vaultx init"));
}

#[test]
fn test_cli_init_twice_is_rejected() {
    let env = TestEnv::new();
    env.init();

    let again = env.run(&["init"], &[("VAULTX_PIN", PIN)]);
    assert_eq!(again.status.code(), Some(4));
    assert!(stderr(&again).contains("already exists"));
}

#[test]
fn test_cli_missing_pin_without_tty() {
    let env = TestEnv::new();
    env.init();

    let list = env.run(&["list"], &[]);
    assert!(!list.status.success());
    assert!(stderr(&list).contains("Set VAULTX_PIN"));
}

#[test]
fn test_cli_generate_uses_master_password() {
    let env = TestEnv::new();
    env.init();

    let missing = env.run(&["generate", "Instagram", "alice@example.com"], &[]);
    assert_eq!(missing.status.code(), Some(3));

    let set = env.run(
        &["master-password", "set"],
        &[("VAULTX_PIN", PIN), ("VAULTX_MASTER_PASSWORD", MASTER)],
    );
    assert!(set.status.success(), "set failed: {}", stderr(&set));

    let generate = env.run(&["generate", "Instagram", "alice@example.com"], &[]);
    assert!(generate.status.success());
    assert_eq!(stdout(&generate).trim(), "zZ*5p3Js*oXD6");

    let add = env.run(
        &["add", "Instagram", "-u", "alice@example.com", "--generate"],
        &[("VAULTX_PIN", PIN)],
    );
    assert!(add.status.success(), "add failed: {}", stderr(&add));
    let show = env.run(&["show", "0", "--quiet"], &[("VAULTX_PIN", PIN)]);
    assert_eq!(stdout(&show).trim(), "zZ*5p3Js*oXD6");
}

#[test]
fn test_cli_change_pin() {
    let env = TestEnv::new();
    env.init();

    let change = env.run(
        &["change-pin"],
        &[("VAULTX_PIN", PIN), ("VAULTX_NEW_PIN", "7391")],
    );
    assert!(change.status.success(), "change failed: {}", stderr(&change));

    let old = env.run(&["list"], &[("VAULTX_PIN", PIN)]);
    assert_eq!(old.status.code(), Some(5));
    assert!(env.list_json("7391").is_empty());
}

#[test]
fn test_cli_backup_reset_restore() {
    let env = TestEnv::new();
    env.init();
    let set = env.run(
        &["master-password", "set"],
        &[("VAULTX_PIN", PIN), ("VAULTX_MASTER_PASSWORD", MASTER)],
    );
    assert!(set.status.success());
    let add = env.run(
        &["add", "HDFC Bank", "-u", "alice"],
        &[
            ("VAULTX_PIN", PIN),
            ("VAULTX_CREDENTIAL_PASSWORD", "bank-pw"),
        ],
    );
    assert!(add.status.success());

    let backup_path = env.dir.path().join("vault.vxb");
    let backup_arg = backup_path.to_string_lossy().to_string();
    let export = env.run(
        &["backup", "export", &backup_arg],
        &[
            ("VAULTX_PIN", PIN),
            ("VAULTX_BACKUP_PASSPHRASE", BACKUP_PASSPHRASE),
        ],
    );
    assert!(export.status.success(), "export failed: {}", stderr(&export));

    let backup: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&backup_path).expect("read backup"))
            .expect("backup json");
    assert_eq!(backup["version"], 1);
    assert!(backup["encryptedMasterPassword"].is_string());

    let reset = env.run(&["reset", "--yes"], &[]);
    assert!(reset.status.success(), "reset failed: {}", stderr(&reset));
    assert!(!env.vault_path().exists());
    assert!(!env.secrets_path().exists());

    let import = env.run(
        &["backup", "import", &backup_arg, "--yes"],
        &[("VAULTX_BACKUP_PASSPHRASE", BACKUP_PASSPHRASE)],
    );
    assert!(import.status.success(), "import failed: {}", stderr(&import));
    assert!(stdout(&import).contains("Master password restored."));

    let entries = env.list_json(PIN);
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0]["category"], "banking");

    let status = env.run(&["master-password", "status"], &[]);
    assert!(stdout(&status).contains("configured"));
    assert!(!stdout(&status).contains("not configured"));
}

#[test]
fn test_cli_import_wrong_passphrase_changes_nothing() {
    let env = TestEnv::new();
    env.init();
    let backup_path = env.dir.path().join("vault.vxb");
    let backup_arg = backup_path.to_string_lossy().to_string();
    let set = env.run(
        &["master-password", "set"],
        &[("VAULTX_PIN", PIN), ("VAULTX_MASTER_PASSWORD", MASTER)],
    );
    assert!(set.status.success());
    let export = env.run(
        &["backup", "export", &backup_arg],
        &[
            ("VAULTX_PIN", PIN),
            ("VAULTX_BACKUP_PASSPHRASE", BACKUP_PASSPHRASE),
        ],
    );
    assert!(export.status.success());

    let vault_before = std::fs::read(env.vault_path()).expect("read vault");
    let import = env.run(
        &["backup", "import", &backup_arg, "--yes"],
        &[("VAULTX_BACKUP_PASSPHRASE", "not-the-passphrase")],
    );
    assert_eq!(import.status.code(), Some(5));
    assert!(stderr(&import).contains("Incorrect backup passphrase."));

    assert_eq!(std::fs::read(env.vault_path()).expect("read vault"), vault_before);
    assert!(env.secrets_path().exists());
}

#[test]
fn test_cli_import_rejects_wrong_extension() {
    let env = TestEnv::new();
    let path = env.dir.path().join("vault.json");
    std::fs::write(&path, "{}").expect("write file");

    let import = env.run(
        &["backup", "import", &path.to_string_lossy(), "--yes"],
        &[("VAULTX_BACKUP_PASSPHRASE", BACKUP_PASSPHRASE)],
    );
    assert_eq!(import.status.code(), Some(4));
    assert!(stderr(&import).contains(".vxb"));
}

#[test]
fn test_cli_reset_requires_confirmation_without_tty() {
    let env = TestEnv::new();
    env.init();

    let reset = env.run(&["reset"], &[]);
    assert_eq!(reset.status.code(), Some(4));
    assert!(env.vault_path().exists());
}

#[test]
fn test_cli_credential_password_never_taken_as_argument() {
    let env = TestEnv::new();
    env.init();

    let add = env.run(
        &["add", "GitHub", "-u", "bob", "--password", "on-the-command-line"],
        &[("VAULTX_PIN", PIN)],
    );
    assert!(!add.status.success());
    assert!(env.list_json(PIN).is_empty());

    let add = env.run(&["add", "GitHub", "-u", "bob"], &[("VAULTX_PIN", PIN)]);
    assert_eq!(add.status.code(), Some(4));
    assert!(stderr(&add).contains("VAULTX_CREDENTIAL_PASSWORD"));
}

#[test]
fn test_cli_edit_password_from_env() {
    let env = TestEnv::new();
    env.init();
    let add = env.run(
        &["add", "GitHub", "-u", "bob"],
        &[("VAULTX_PIN", PIN), ("VAULTX_CREDENTIAL_PASSWORD", "old-pw")],
    );
    assert!(add.status.success(), "add failed: {}", stderr(&add));

    let edit = env.run(
        &["edit", "0", "--password"],
        &[("VAULTX_PIN", PIN), ("VAULTX_CREDENTIAL_PASSWORD", "new-pw")],
    );
    assert!(edit.status.success(), "edit failed: {}", stderr(&edit));

    let show = env.run(&["show", "0", "--quiet"], &[("VAULTX_PIN", PIN)]);
    assert_eq!(stdout(&show).trim(), "new-pw");
}

#[test]
fn test_cli_cheap_kdf_config_rejected() {
    let env = TestEnv::new();
    let config = env.dir.path().join("config").join("vaultx").join("config.toml");
    std::fs::write(
        &config,
        "[security]\nsecret_backend = \"file\"\n\n[kdf]\nmemory_kib = 8\niterations = 1\nparallelism = 1\n",
    )
    .expect("write config");

    let init = env.run(&["init"], &[("VAULTX_PIN", PIN)]);
    assert_eq!(init.status.code(), Some(4));
    assert!(stderr(&init).contains("at least"));
    assert!(!env.vault_path().exists());
}

#[test]
fn test_cli_secrets_file_follows_config_override() {
    let env = TestEnv::new();
    let custom_dir = env.dir.path().join("elsewhere");
    std::fs::create_dir_all(&custom_dir).expect("create dir");
    let custom_config = custom_dir.join("config.toml");
    std::fs::copy(
        env.dir.path().join("config").join("vaultx").join("config.toml"),
        &custom_config,
    )
    .expect("copy config");
    let config_var = custom_config.to_string_lossy().to_string();

    let init = env.run(
        &["init"],
        &[("VAULTX_PIN", PIN), ("VAULTX_CONFIG", config_var.as_str())],
    );
    assert!(init.status.success(), "init failed: {}", stderr(&init));
    let set = env.run(
        &["master-password", "set"],
        &[
            ("VAULTX_PIN", PIN),
            ("VAULTX_MASTER_PASSWORD", MASTER),
            ("VAULTX_CONFIG", config_var.as_str()),
        ],
    );
    assert!(set.status.success(), "set failed: {}", stderr(&set));

    assert!(custom_dir.join("secrets.json").exists());
    assert!(!env.secrets_path().exists());
}
