use cmdtable::{BoundOptions, ClientBootstrap, CommandOptions, Parsed, ShellError};
use openstackcli::{
    build_program, BaseOptions, OpenStackBootstrap, OpenStackRegion, ProxyConfig, DEFAULT_REGION,
};
use serial_test::serial;
use std::env;
use std::sync::atomic::{AtomicUsize, Ordering};

const OPENSTACK_VARS: [&str; 8] = [
    "OPENSTACK_AUTH_URL",
    "OPENSTACK_USERNAME",
    "OPENSTACK_PASSWORD",
    "OPENSTACK_PROJECT",
    "OPENSTACK_ENDPOINT_TYPE",
    "OPENSTACK_DOMAIN_NAME",
    "OPENSTACK_PROJECT_DOMAIN",
    "OPENSTACK_REGION_ID",
];

fn clear_env() {
    for var in OPENSTACK_VARS {
        env::remove_var(var);
    }
}

const CREDENTIALS: [&str; 8] = [
    "--auth-url",
    "http://keystone:5000/v3",
    "--username",
    "u",
    "--password",
    "p",
    "--project",
    "P",
];

fn with_credentials(rest: &[&str]) -> Vec<String> {
    CREDENTIALS
        .iter()
        .chain(rest)
        .map(|s| s.to_string())
        .collect()
}

/// Wraps the real bootstrap and counts how often it runs.
struct CountingBootstrap {
    inner: OpenStackBootstrap,
    calls: AtomicUsize,
}

impl CountingBootstrap {
    fn new() -> Self {
        Self {
            inner: OpenStackBootstrap::new(ProxyConfig::default()),
            calls: AtomicUsize::new(0),
        }
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl ClientBootstrap for CountingBootstrap {
    type Client = OpenStackRegion;

    fn bootstrap(&self, base: &BoundOptions) -> anyhow::Result<OpenStackRegion> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.inner.bootstrap(base)
    }
}

#[test]
#[serial]
fn test_list_regions_bootstraps_once() {
    clear_env();
    let program = build_program().unwrap().with_color(false);
    let bootstrap = CountingBootstrap::new();

    let args = with_credentials(&["list-regions"]);
    let Parsed::Run(invocation) = program.parse(&args).unwrap() else {
        panic!("expected list-regions to run");
    };
    assert_eq!(invocation.command(), "list-regions");
    assert!(!invocation.options().flag("json").unwrap());

    invocation.execute(&bootstrap).unwrap();
    assert_eq!(bootstrap.calls(), 1);
}

#[test]
#[serial]
fn test_base_options_bind_alongside_command() {
    clear_env();
    let program = build_program().unwrap();

    let args = with_credentials(&[
        "--region-id",
        "RegionTwo",
        "region-show",
        "RegionTwo",
        "--json",
    ]);
    let Parsed::Run(invocation) = program.parse(&args).unwrap() else {
        panic!("expected region-show to run");
    };

    let base = BaseOptions::from_bound(invocation.base()).unwrap();
    assert_eq!(base.region_id, "RegionTwo");
    assert_eq!(base.project, "P");
    assert_eq!(base.endpoint_type, "internal");
    assert_eq!(invocation.options().string("region").unwrap(), "RegionTwo");
    assert!(invocation.options().flag("json").unwrap());
}

#[test]
#[serial]
fn test_missing_auth_url_fails_before_bootstrap() {
    clear_env();
    let program = build_program().unwrap();
    let bootstrap = CountingBootstrap::new();

    let Parsed::Run(invocation) = program
        .parse(&["--username", "u", "--password", "p", "list-regions"])
        .unwrap()
    else {
        panic!("expected list-regions to run");
    };
    let err = invocation.execute(&bootstrap).unwrap_err();

    assert!(matches!(&err, ShellError::MissingRequiredCredential(name) if name == "auth-url"));
    assert_eq!(bootstrap.calls(), 0);
}

#[test]
#[serial]
fn test_credentials_from_environment() {
    clear_env();
    env::set_var("OPENSTACK_AUTH_URL", "https://keystone.example/v3");
    env::set_var("OPENSTACK_USERNAME", "admin");
    env::set_var("OPENSTACK_PASSWORD", "secret");

    let program = build_program().unwrap();
    let bootstrap = CountingBootstrap::new();
    let result = match program.parse(&["show-config"]).unwrap() {
        Parsed::Run(invocation) => invocation.execute(&bootstrap),
        Parsed::Help(_) => panic!("unexpected help"),
    };
    clear_env();

    result.unwrap();
    assert_eq!(bootstrap.calls(), 1);
}

#[test]
#[serial]
fn test_bad_auth_url_is_a_bootstrap_failure() {
    clear_env();
    let program = build_program().unwrap();
    let bootstrap = CountingBootstrap::new();

    let args: Vec<String> = [
        "--auth-url",
        "ftp://keystone",
        "--username",
        "u",
        "--password",
        "p",
        "list-regions",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect();
    let Parsed::Run(invocation) = program.parse(&args).unwrap() else {
        panic!("expected list-regions to run");
    };
    let err = invocation.execute(&bootstrap).unwrap_err();

    assert!(matches!(err, ShellError::ClientBootstrapFailure(_)));
    assert!(err.to_string().contains("ftp://keystone"));
}

#[test]
#[serial]
fn test_region_show_unknown_region_is_command_failure() {
    clear_env();
    let program = build_program().unwrap();
    let bootstrap = CountingBootstrap::new();

    let args = with_credentials(&["region-show", "Nowhere"]);
    let Parsed::Run(invocation) = program.parse(&args).unwrap() else {
        panic!("expected region-show to run");
    };
    let err = invocation.execute(&bootstrap).unwrap_err();

    assert!(matches!(err, ShellError::CommandFailure(_)));
    assert_eq!(err.to_string(), "No such region Nowhere");
}

#[test]
fn test_help_for_command_needs_no_credentials() {
    let program = build_program().unwrap().with_color(false);
    let Parsed::Help(text) = program.parse(&["help", "region-show"]).unwrap() else {
        panic!("expected help text");
    };
    assert!(text.starts_with("usage: openstackcli region-show [--json] <REGION>"));
    assert!(text.contains("Show details of a region"));
}

#[test]
fn test_unknown_command_has_top_level_usage() {
    let program = build_program().unwrap();
    let err = program.parse(&["bogus"]).err().unwrap();
    assert!(matches!(&err, ShellError::UnknownCommand { name, .. } if name == "bogus"));
    assert!(err.usage().unwrap().starts_with("usage: openstackcli [--debug] [--help]"));
}

#[test]
fn test_missing_region_argument() {
    let program = build_program().unwrap();
    let err = program.parse(&["region-show"]).err().unwrap();
    assert!(matches!(&err, ShellError::MissingArgument { name, .. } if name == "<REGION>"));
    assert_eq!(
        err.usage(),
        Some("usage: openstackcli region-show [--json] <REGION>\n")
    );
}

#[test]
#[serial]
fn test_parsing_twice_binds_the_same_values() {
    clear_env();
    env::set_var("OPENSTACK_REGION_ID", "RegionEnv");
    let program = build_program().unwrap();
    let args = with_credentials(&["list-regions", "--json"]);

    let bind = || match program.parse(&args).unwrap() {
        Parsed::Run(invocation) => (invocation.base().clone(), invocation.options().clone()),
        Parsed::Help(_) => panic!("unexpected help"),
    };
    let first = bind();
    let second = bind();
    clear_env();

    assert_eq!(first, second);
    assert_eq!(
        BaseOptions::from_bound(&first.0).unwrap().region_id,
        "RegionEnv"
    );
    assert_ne!(
        BaseOptions::from_bound(&first.0).unwrap().region_id,
        DEFAULT_REGION
    );
}
