//! Entity discovery: resolve an entity url to its canonical identity and
//! API roots.
//!
//! Discovery runs once and in a single pass:
//!
//! 1. `HEAD` the entity url and read its `Link` headers.
//! 2. Pick the profile link (the first `https://tent.io/rels/profile` link,
//!    else the first link of any relation).
//! 3. `GET` the profile and read `entity` and `servers` from the core info.
//!
//! There are no retries and no fallback to other candidates. HTML `<link>`
//! tags are not looked at.

use std::str::FromStr;

use http::header::LINK;
use http::{HeaderMap, Method, Uri};
use log::debug;
use serde::Deserialize;
use tentapp_core::{Context, Error, Result};

use crate::Config;

/// Profile info type holding the entity and its servers.
pub const CORE_INFO_TYPE: &str = "https://tent.io/types/info/core/v0.1.0";

/// Link relation pointing at an entity's profile.
pub const PROFILE_REL: &str = "https://tent.io/rels/profile";

/// Outcome of a successful discovery.
///
/// `servers` is never empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedEntity {
    entity: String,
    servers: Vec<String>,
}

impl ResolvedEntity {
    /// Build a resolved entity, failing with `ProfileShape` if there are no servers.
    pub fn new(entity: impl Into<String>, servers: Vec<String>) -> Result<Self> {
        if servers.is_empty() {
            return Err(Error::profile_shape("profile lists no servers"));
        }

        Ok(Self {
            entity: entity.into(),
            servers,
        })
    }

    /// Canonical entity identity.
    pub fn entity(&self) -> &str {
        &self.entity
    }

    /// API roots in the order the profile lists them.
    pub fn servers(&self) -> &[String] {
        &self.servers
    }

    /// API root every call goes to: the first server.
    pub fn api_root(&self) -> &str {
        &self.servers[0]
    }
}

/// One entry of a `Link` header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Link {
    /// Target uri reference, without the angle brackets.
    pub target: String,
    /// Value of the `rel` parameter, if any.
    pub rel: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CoreInfo {
    entity: String,
    servers: Vec<String>,
}

/// Discover the entity behind `entity_url`.
///
/// # Errors
///
/// - `MalformedTarget` if `entity_url` is not an absolute url.
/// - `ProfileFetch` if the probe or the profile request fails, the profile
///   answers with a non-success status or its body is not json.
/// - `DiscoveryUnsupported` if the entity exposes no usable `Link` header.
/// - `ProfileShape` if the profile lacks the core info or lists no servers.
pub async fn discover(ctx: &Context, config: &Config, entity_url: &str) -> Result<ResolvedEntity> {
    let entity_uri = Uri::from_str(entity_url)?;
    if entity_uri.scheme().is_none() || entity_uri.host().map_or(true, str::is_empty) {
        return Err(Error::malformed_target(format!(
            "entity url {entity_url} must be absolute"
        )));
    }

    debug!("probing entity {entity_url}");
    let req = config.build_request(Method::HEAD, entity_uri.clone(), &HeaderMap::new())?;
    let resp = ctx.http_send(req).await.map_err(|e| {
        Error::profile_fetch(format!("failed to probe entity {entity_url}")).with_source(e)
    })?;

    let links = link_headers(resp.headers());
    if links.is_empty() {
        return Err(Error::discovery_unsupported(format!(
            "entity {entity_url} exposes no Link header and html discovery is not supported"
        )));
    }

    let link = select_profile_link(&links).ok_or_else(|| {
        Error::discovery_unsupported(format!(
            "Link header of entity {entity_url} carries no usable link"
        ))
    })?;
    let profile_url = resolve_target(&entity_uri, &link.target);
    debug!("fetching profile {profile_url} of entity {entity_url}");

    let resolved = fetch_profile(ctx, config, &profile_url).await?;
    debug!(
        "entity {entity_url} resolved to {} with servers {:?}",
        resolved.entity(),
        resolved.servers()
    );
    Ok(resolved)
}

async fn fetch_profile(ctx: &Context, config: &Config, profile_url: &str) -> Result<ResolvedEntity> {
    let uri = Uri::from_str(profile_url).map_err(|e| {
        Error::profile_fetch(format!("profile url {profile_url} is invalid")).with_source(e)
    })?;
    let req = config.build_request(Method::GET, uri, &HeaderMap::new())?;
    let resp = ctx.http_send(req).await.map_err(|e| {
        Error::profile_fetch(format!("failed to fetch profile {profile_url}")).with_source(e)
    })?;

    let status = resp.status();
    if !status.is_success() {
        return Err(Error::profile_fetch(format!(
            "profile {profile_url} answered with status {status}"
        ))
        .with_status(status));
    }

    let profile: serde_json::Value = serde_json::from_slice(resp.body()).map_err(|e| {
        Error::profile_fetch(format!("profile {profile_url} is not valid json")).with_source(e)
    })?;

    let info = profile.get(CORE_INFO_TYPE).ok_or_else(|| {
        Error::profile_shape(format!("profile {profile_url} has no {CORE_INFO_TYPE} info"))
    })?;
    let info = CoreInfo::deserialize(info).map_err(|e| {
        Error::profile_shape(format!("core info of profile {profile_url} is invalid"))
            .with_source(e)
    })?;

    ResolvedEntity::new(info.entity, info.servers)
}

/// Collect the links of every `Link` header value, in order.
fn link_headers(headers: &HeaderMap) -> Vec<Link> {
    headers
        .get_all(LINK)
        .iter()
        .map(|v| String::from_utf8_lossy(v.as_bytes()).into_owned())
        .flat_map(|v| parse_link_header(&v))
        .collect()
}

/// The first profile link, or the first link at all.
///
/// `rel` holds a space separated list of relation types.
fn select_profile_link(links: &[Link]) -> Option<&Link> {
    links
        .iter()
        .find(|l| {
            l.rel
                .as_deref()
                .is_some_and(|r| r.split_ascii_whitespace().any(|t| t == PROFILE_REL))
        })
        .or_else(|| links.first())
}

/// Resolve absolute-path references against the entity url. Anything else is
/// used as given.
fn resolve_target(base: &Uri, target: &str) -> String {
    if !target.starts_with('/') || target.starts_with("//") {
        return target.to_string();
    }

    match (base.scheme_str(), base.authority()) {
        (Some(scheme), Some(authority)) => format!("{scheme}://{authority}{target}"),
        _ => target.to_string(),
    }
}

/// Parse a `Link` header value.
///
/// ```text
/// <https://example.test/profile>; rel="https://tent.io/rels/profile", </other>; rel=next
/// ```
///
/// Malformed entries are skipped. Commas inside `<...>` or quoted parameter
/// values don't split entries.
pub fn parse_link_header(value: &str) -> Vec<Link> {
    let mut links = Vec::new();
    let mut rest = value;

    loop {
        rest = rest.trim_start_matches(|c: char| c == ',' || c.is_whitespace());
        if rest.is_empty() {
            break;
        }

        let Some(after_open) = rest.strip_prefix('<') else {
            // Not a link, skip to the next entry.
            rest = skip_entry(rest);
            continue;
        };
        let Some(close) = after_open.find('>') else {
            break;
        };
        let target = after_open[..close].trim().to_string();
        rest = &after_open[close + 1..];

        let mut rel = None;
        loop {
            rest = rest.trim_start();
            let Some(after_semi) = rest.strip_prefix(';') else {
                break;
            };
            let (name, value, remain) = parse_param(after_semi);
            if name.eq_ignore_ascii_case("rel") && rel.is_none() {
                rel = value;
            }
            rest = remain;
        }

        if !target.is_empty() {
            links.push(Link { target, rel });
        }
        rest = skip_entry(rest);
    }

    links
}

/// Parse `name[=value]` right after a `;`, returning the rest of the input.
fn parse_param(input: &str) -> (&str, Option<String>, &str) {
    let input = input.trim_start();
    let name_end = input
        .find(|c: char| c == '=' || c == ';' || c == ',')
        .unwrap_or(input.len());
    let name = input[..name_end].trim();
    let rest = &input[name_end..];

    let Some(rest) = rest.strip_prefix('=') else {
        return (name, None, rest);
    };
    let rest = rest.trim_start();

    if let Some(quoted) = rest.strip_prefix('"') {
        let mut value = String::new();
        let mut chars = quoted.char_indices();
        while let Some((idx, c)) = chars.next() {
            match c {
                '\\' => {
                    if let Some((_, escaped)) = chars.next() {
                        value.push(escaped);
                    }
                }
                '"' => return (name, Some(value), &quoted[idx + 1..]),
                c => value.push(c),
            }
        }
        // Unterminated quote, take what we have.
        return (name, Some(value), "");
    }

    let end = rest.find([';', ',']).unwrap_or(rest.len());
    (name, Some(rest[..end].trim().to_string()), &rest[end..])
}

/// Skip to the next `,` that separates link entries.
fn skip_entry(input: &str) -> &str {
    let mut in_quotes = false;
    let mut in_target = false;
    for (idx, c) in input.char_indices() {
        match c {
            '"' if !in_target => in_quotes = !in_quotes,
            '<' if !in_quotes => in_target = true,
            '>' if !in_quotes => in_target = false,
            ',' if !in_quotes && !in_target => return &input[idx + 1..],
            _ => {}
        }
    }
    ""
}
