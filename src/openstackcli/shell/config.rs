use super::render;
use super::JsonOptions;
use crate::client::OpenStackRegion;
use crate::config::ClientConfig;
use cmdtable::{Registry, Result};
use serde::Serialize;

#[derive(Serialize)]
struct ConfigView<'a> {
    #[serde(flatten)]
    config: &'a ClientConfig,
    region: &'a str,
    auth_proxy: Option<&'a str>,
}

pub(super) fn register(registry: &mut Registry<OpenStackRegion>) -> Result<()> {
    registry.register_with_client(
        "show-config",
        "Show the resolved client configuration",
        |client: &OpenStackRegion, opts: JsonOptions| {
            print!("{}", show_config(client, opts.json, render::use_color())?);
            Ok(())
        },
    )
}

fn show_config(client: &OpenStackRegion, json: bool, use_color: bool) -> anyhow::Result<String> {
    let config = client.client().config();
    let view = ConfigView {
        config,
        region: client.id(),
        auth_proxy: config.auth_proxy(),
    };
    if json {
        return render::json(&view);
    }

    let password = if config.password().is_empty() { "" } else { "******" };
    Ok(render::key_values(
        &[
            ("auth_url", config.auth_url().to_string()),
            ("username", config.username().to_string()),
            ("password", password.to_string()),
            ("project", config.project().to_string()),
            ("project_domain", config.project_domain().to_string()),
            ("domain_name", config.get_domain_name().to_string()),
            ("endpoint_type", config.get_endpoint_type().to_string()),
            ("region", view.region.to_string()),
            ("debug", config.is_debug().to_string()),
            ("auth_proxy", view.auth_proxy.unwrap_or("(direct)").to_string()),
        ],
        use_color,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::{OpenStackClient, Region};
    use crate::config::ProxyConfig;

    fn client(proxy: ProxyConfig) -> OpenStackRegion {
        let config = ClientConfig::new(
            "https://keystone.example/v3",
            "admin",
            "s3cret",
            "demo",
            "Default",
        )
        .endpoint_type("public")
        .proxy(proxy);
        OpenStackClient::new(config, vec![Region::new("RegionOne", "public")])
            .unwrap()
            .get_region("RegionOne")
            .unwrap()
    }

    #[test]
    fn test_plain_output_masks_password() {
        let out = show_config(&client(ProxyConfig::default()), false, false).unwrap();
        assert!(out.contains("password:       ******\n"));
        assert!(out.contains("auth_proxy:     (direct)\n"));
        assert!(out.contains("region:         RegionOne\n"));
        assert!(!out.contains("s3cret"));
    }

    #[test]
    fn test_json_output_includes_proxy_and_region() {
        let proxy = ProxyConfig {
            http_proxy: None,
            https_proxy: Some("http://proxy:3128".into()),
            no_proxy: vec![],
        };
        let out = show_config(&client(proxy), true, false).unwrap();
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();

        assert_eq!(value["password"], "******");
        assert_eq!(value["endpoint_type"], "public");
        assert_eq!(value["region"], "RegionOne");
        assert_eq!(value["auth_proxy"], "http://proxy:3128");
        assert_eq!(value["proxy"]["https_proxy"], "http://proxy:3128");
    }
}
