use crate::aws::client::ServiceKind;
use crate::error::ConstructionError;
use std::fmt;
use url::Url;

/// Placeholder replaced by the region code in a pattern template
pub const REGION_SLOT: &str = "{region}";

/// A validated endpoint that reads back exactly as it was given
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    raw: String,
    url: Url,
}

impl Endpoint {
    pub fn parse(raw: impl Into<String>) -> Result<Self, url::ParseError> {
        let raw = raw.into();
        let url = Url::parse(&raw)?;
        Ok(Self { raw, url })
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    pub fn url(&self) -> &Url {
        &self.url
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

/// Regional endpoint for the services listed in `kinds`
#[derive(Debug, Clone, Copy)]
pub struct EndpointPattern {
    pub name: &'static str,
    pub kinds: &'static [ServiceKind],
    pub template: &'static str,
}

/// Scanned in order, first match wins. Services without an entry (IAM)
/// keep their global endpoint in every region.
pub const ENDPOINT_PATTERNS: &[EndpointPattern] = &[
    EndpointPattern {
        name: "elasticbeanstalk",
        kinds: &[ServiceKind::ElasticBeanstalk],
        template: "https://elasticbeanstalk.{region}.amazonaws.com",
    },
    EndpointPattern {
        name: "s3",
        kinds: &[ServiceKind::S3],
        template: "https://s3.{region}.amazonaws.com",
    },
    EndpointPattern {
        name: "ec2",
        kinds: &[ServiceKind::Ec2],
        template: "https://ec2.{region}.amazonaws.com",
    },
    EndpointPattern {
        name: "elasticloadbalancing",
        kinds: &[ServiceKind::ElasticLoadBalancing],
        template: "https://elasticloadbalancing.{region}.amazonaws.com",
    },
    EndpointPattern {
        name: "ssm",
        kinds: &[ServiceKind::Ssm],
        template: "https://ssm.{region}.amazonaws.com",
    },
];

impl EndpointPattern {
    pub fn matches(&self, kind: ServiceKind) -> bool {
        self.kinds.contains(&kind)
    }

    pub fn render(&self, region: &str) -> String {
        self.template.replacen(REGION_SLOT, region, 1)
    }

    pub fn endpoint_for(&self, region: &str) -> Result<Endpoint, ConstructionError> {
        let rendered = self.render(region);
        match Url::parse(&rendered) {
            Ok(url) => Ok(Endpoint { raw: rendered, url }),
            Err(e) => Err(ConstructionError::InvalidEndpoint {
                url: rendered,
                reason: e.to_string(),
            }),
        }
    }
}

pub fn pattern_for(kind: ServiceKind) -> Option<&'static EndpointPattern> {
    ENDPOINT_PATTERNS.iter().find(|pattern| pattern.matches(kind))
}
