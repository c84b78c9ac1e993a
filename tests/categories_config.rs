// tests/categories_config.rs
use market_scout::config::scout::{
    ENV_CATEGORIES_PATH, ENV_CONFIG_PATH, ENV_FIXTURES_DIR, ENV_PROVIDER_BASE_URL,
};
use market_scout::{build_dashboard, CategoryRegistry, RenderVariant, ScoutConfig, ViewBody};
use std::path::{Path, PathBuf};
use std::{env, fs};

fn fixtures_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures")
}

fn clear_scout_env() {
    for key in [
        ENV_CONFIG_PATH,
        ENV_PROVIDER_BASE_URL,
        ENV_CATEGORIES_PATH,
        ENV_FIXTURES_DIR,
    ] {
        env::remove_var(key);
    }
}

#[test]
fn builtin_catalog_shape() {
    let r = CategoryRegistry::builtin().unwrap();
    assert_eq!(r.list().len(), 16);
    assert_eq!(r.default_category().name, "PFAS");

    let news = r.find("Industry News").unwrap();
    assert_eq!(news.variant, RenderVariant::LinkList);
    assert!(!news.shows_window_controls());

    let profile = r.find("Company Profile").unwrap();
    assert_eq!(profile.variant, RenderVariant::Profile);
    assert_eq!(profile.link.as_deref(), Some("https://www.haycarb.com"));

    assert!(r.find("pfas").is_none(), "lookup is exact");
}

#[test]
fn registry_file_is_validated() {
    let dir = tempfile::tempdir().unwrap();

    let ok = dir.path().join("categories.toml");
    fs::write(
        &ok,
        r#"
[[categories]]
name = " Biochar "

[[categories]]
name = "Market Wire"
variant = "link-list"
"#,
    )
    .unwrap();
    let r = CategoryRegistry::load_from(&ok).unwrap();
    let names: Vec<&str> = r.list().iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, vec!["Biochar", "Market Wire"]);
    assert_eq!(r.list()[0].variant, RenderVariant::Default);

    let dup = dir.path().join("dup.toml");
    fs::write(
        &dup,
        r#"
[[categories]]
name = "PFAS"

[[categories]]
name = "PFAS "
"#,
    )
    .unwrap();
    let err = CategoryRegistry::load_from(&dup).unwrap_err();
    assert!(format!("{err:#}").contains("duplicate"), "got {err:#}");

    let empty = dir.path().join("empty.toml");
    fs::write(&empty, "categories = []\n").unwrap();
    assert!(CategoryRegistry::load_from(&empty).is_err());

    let bad_variant = dir.path().join("bad.toml");
    fs::write(
        &bad_variant,
        "[[categories]]\nname = \"X\"\nvariant = \"carousel\"\n",
    )
    .unwrap();
    assert!(CategoryRegistry::load_from(&bad_variant).is_err());
}

#[serial_test::serial]
#[test]
fn default_uses_env_then_fallbacks() {
    // Isolate CWD so the repo's own config/ is not picked up.
    let old = env::current_dir().unwrap();
    let tmp = tempfile::tempdir().unwrap();
    env::set_current_dir(tmp.path()).unwrap();
    clear_scout_env();

    // 1) Nothing at all -> defaults
    let cfg = ScoutConfig::load_default().unwrap();
    assert_eq!(cfg, ScoutConfig::default());

    // 2) ./config/scout.toml
    let cfg_dir = tmp.path().join("config");
    fs::create_dir_all(&cfg_dir).unwrap();
    fs::write(
        cfg_dir.join("scout.toml"),
        r#"provider_base_url = "https://scout.example.com/api""#,
    )
    .unwrap();
    let cfg = ScoutConfig::load_default().unwrap();
    assert_eq!(cfg.provider_base_url, "https://scout.example.com/api");

    // 3) SCOUT_CONFIG_PATH wins over the fallback file
    let explicit = tmp.path().join("other.toml");
    fs::write(&explicit, r#"provider_base_url = "http://10.0.0.5:9000""#).unwrap();
    env::set_var(ENV_CONFIG_PATH, explicit.display().to_string());
    let cfg = ScoutConfig::load_default().unwrap();
    assert_eq!(cfg.provider_base_url, "http://10.0.0.5:9000");

    // 4) Field overrides on top
    env::set_var(ENV_PROVIDER_BASE_URL, "http://override:8000");
    env::set_var(ENV_FIXTURES_DIR, fixtures_dir().display().to_string());
    let cfg = ScoutConfig::load_default().unwrap();
    assert_eq!(cfg.provider_base_url, "http://override:8000");
    assert_eq!(cfg.fixtures_dir, Some(fixtures_dir()));

    // 5) Missing explicit path is an error, not a silent fallback
    env::set_var(ENV_CONFIG_PATH, tmp.path().join("nope.toml").display().to_string());
    assert!(ScoutConfig::load_default().is_err());

    // 6) Invalid base URL is rejected
    env::remove_var(ENV_CONFIG_PATH);
    env::set_var(ENV_PROVIDER_BASE_URL, "ftp://example.com");
    assert!(ScoutConfig::load_default().is_err());

    clear_scout_env();
    env::set_current_dir(&old).unwrap();
}

#[tokio::test]
async fn fixture_config_builds_offline_dashboard() {
    let cfg = ScoutConfig {
        fixtures_dir: Some(fixtures_dir()),
        ..ScoutConfig::default()
    };
    let dashboard = build_dashboard(&cfg).unwrap();

    let vm = dashboard.select_category("Industry News").await.unwrap();
    let ViewBody::LinkList { items } = &vm.body else {
        panic!("expected link list, got {:?}", vm.body);
    };
    assert!(!items.is_empty());
    assert!(items.iter().all(|i| i.link.is_some()));

    let vm = dashboard.select_category("Company Profile").await.unwrap();
    assert!(matches!(vm.body, ViewBody::Profile { .. }));
}
