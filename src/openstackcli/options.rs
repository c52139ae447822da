use cmdtable::{BoundOptions, CommandOptions, OptionField, OptionSchema, Result};

/// Region used when neither `--region-id` nor `$OPENSTACK_REGION_ID` give one.
pub const DEFAULT_REGION: &str = "RegionOne";

/// Top-level options shared by every command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BaseOptions {
    pub debug: bool,
    pub auth_url: String,
    pub username: String,
    pub password: String,
    pub project: String,
    pub endpoint_type: String,
    pub domain_name: String,
    pub project_domain: String,
    pub region_id: String,
    pub subcommand: String,
}

fn env_string(name: &str, help: &str, var: &str) -> OptionField {
    OptionField::string(name)
        .help(help)
        .default(&format!("${}", var))
        .metavar(var)
}

fn env_string_or(name: &str, help: &str, var: &str, fallback: &str) -> OptionField {
    OptionField::string(name)
        .help(help)
        .default(&format!("${}|{}", var, fallback))
        .metavar(var)
}

impl CommandOptions for BaseOptions {
    fn schema() -> Result<OptionSchema> {
        OptionSchema::builder()
            .field(OptionField::bool("debug").help("debug mode"))
            .field(OptionField::bool("help").help("Show help"))
            .field(env_string("auth-url", "Auth URL", "OPENSTACK_AUTH_URL").required())
            .field(env_string("username", "Username", "OPENSTACK_USERNAME").required())
            .field(env_string("password", "Password", "OPENSTACK_PASSWORD").required())
            .field(env_string("project", "Project", "OPENSTACK_PROJECT"))
            .field(env_string_or(
                "endpoint-type",
                "Endpoint type",
                "OPENSTACK_ENDPOINT_TYPE",
                "internal",
            ))
            .field(env_string_or(
                "domain-name",
                "Domain of user",
                "OPENSTACK_DOMAIN_NAME",
                "Default",
            ))
            .field(env_string_or(
                "project-domain",
                "Domain of project",
                "OPENSTACK_PROJECT_DOMAIN",
                "Default",
            ))
            .field(env_string("region-id", "RegionId", "OPENSTACK_REGION_ID"))
            .field(OptionField::selector("subcommand").help("openstackcli subcommand"))
            .build()
    }

    fn from_bound(bound: &BoundOptions) -> Result<Self> {
        let region_id = match bound.optional_string("region-id")? {
            Some(region) => region.to_string(),
            None => DEFAULT_REGION.to_string(),
        };

        Ok(Self {
            debug: bound.flag("debug")?,
            auth_url: bound.string("auth-url")?.to_string(),
            username: bound.string("username")?.to_string(),
            password: bound.string("password")?.to_string(),
            project: bound.string("project")?.to_string(),
            endpoint_type: bound.string("endpoint-type")?.to_string(),
            domain_name: bound.string("domain-name")?.to_string(),
            project_domain: bound.string("project-domain")?.to_string(),
            region_id,
            subcommand: bound
                .optional_string("subcommand")?
                .unwrap_or_default()
                .to_string(),
        })
    }
}
