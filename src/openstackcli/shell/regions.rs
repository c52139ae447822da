use super::render;
use super::{json_flag, JsonOptions};
use crate::client::{OpenStackRegion, Region};
use anyhow::anyhow;
use cmdtable::{BoundOptions, CommandOptions, OptionField, OptionSchema, Registry, Result};

struct RegionShowOptions {
    region: String,
    json: bool,
}

impl CommandOptions for RegionShowOptions {
    fn schema() -> Result<OptionSchema> {
        OptionSchema::builder()
            .field(OptionField::positional("region").help("ID of region").required())
            .field(json_flag())
            .build()
    }

    fn from_bound(bound: &BoundOptions) -> Result<Self> {
        Ok(Self {
            region: bound.string("region")?.to_string(),
            json: bound.flag("json")?,
        })
    }
}

pub(super) fn register(registry: &mut Registry<OpenStackRegion>) -> Result<()> {
    registry.register_with_client(
        "list-regions",
        "List regions",
        |client: &OpenStackRegion, opts: JsonOptions| {
            print!("{}", list_regions(client, opts.json, render::use_color())?);
            Ok(())
        },
    )?;
    registry.register_with_client(
        "region-show",
        "Show details of a region",
        |client: &OpenStackRegion, opts: RegionShowOptions| {
            print!("{}", region_show(client, &opts, render::use_color())?);
            Ok(())
        },
    )
}

fn list_regions(client: &OpenStackRegion, json: bool, use_color: bool) -> anyhow::Result<String> {
    let regions = client.client().regions();
    if json {
        render::json(regions)
    } else {
        Ok(render::region_table(regions, use_color))
    }
}

fn region_show(
    client: &OpenStackRegion,
    opts: &RegionShowOptions,
    use_color: bool,
) -> anyhow::Result<String> {
    let region: &Region = client
        .client()
        .regions()
        .iter()
        .find(|r| r.id == opts.region)
        .ok_or_else(|| anyhow!("No such region {}", opts.region))?;

    if opts.json {
        return render::json(region);
    }
    Ok(render::key_values(
        &[
            ("id", region.id.clone()),
            ("endpoint_type", region.endpoint_type.clone()),
            ("selected", (region.id == client.id()).to_string()),
        ],
        use_color,
    ))
}
