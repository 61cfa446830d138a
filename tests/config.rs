use codeflow::config::AnalysisConfig;

#[test]
fn default_config_covers_the_stock_allow_list() {
    let config = AnalysisConfig::default();

    assert!(config.allowed_extensions.contains("py"));
    assert!(config.allowed_extensions.contains("tsx"));
    assert!(config.ignored_dirs.contains("node_modules"));
    assert_eq!(config.max_nodes, 10_000);
    assert_eq!(config.max_edges, 50_000);
}

// single test: the overrides share process-wide environment state
#[test]
fn environment_overrides_are_applied() {
    std::env::set_var("CODEFLOW_ALLOWED_EXTENSIONS", ".py, JS ,");
    std::env::set_var("CODEFLOW_IGNORED_DIRS", "target,vendor");
    std::env::set_var("CODEFLOW_MAX_NODES", "123");
    std::env::set_var("CODEFLOW_MAX_EDGES", "456");

    let config = AnalysisConfig::from_env();

    assert_eq!(config.allowed_extensions.len(), 2);
    assert!(config.allowed_extensions.contains("py"));
    assert!(config.allowed_extensions.contains("js"));
    assert_eq!(config.ignored_dirs.len(), 2);
    assert!(config.ignored_dirs.contains("vendor"));
    assert_eq!(config.max_nodes, 123);
    assert_eq!(config.max_edges, 456);

    // malformed numbers fall back to the default
    std::env::set_var("CODEFLOW_MAX_NODES", "not-a-number");
    let config = AnalysisConfig::from_env();
    assert_eq!(config.max_nodes, 10_000);

    std::env::remove_var("CODEFLOW_ALLOWED_EXTENSIONS");
    std::env::remove_var("CODEFLOW_IGNORED_DIRS");
    std::env::remove_var("CODEFLOW_MAX_NODES");
    std::env::remove_var("CODEFLOW_MAX_EDGES");
}
