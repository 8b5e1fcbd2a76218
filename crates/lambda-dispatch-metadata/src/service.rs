//! Service (deployable unit) descriptor

use std::collections::BTreeMap;

use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;
use serde_json::{Map, Value};

use crate::value::ClassId;

/// IAM policy statement granted to the service's functions
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IamStatement {
    #[serde(rename = "Effect")]
    pub effect: String,
    #[serde(rename = "Action")]
    pub action: Vec<String>,
    #[serde(rename = "Resource")]
    pub resource: String,
}

impl IamStatement {
    pub fn allow(action: Vec<String>, resource: impl Into<String>) -> Self {
        Self {
            effect: "Allow".to_string(),
            action,
            resource: resource.into(),
        }
    }
}

/// Cloud provider configuration of a service
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProviderConfig {
    pub name: String,
    pub stage: String,
    pub region: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub runtime: Option<String>,
    #[serde(rename = "iamRoleStatements", skip_serializing_if = "Vec::is_empty")]
    pub iam_role_statements: Vec<IamStatement>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub environment: BTreeMap<String, String>,
}

impl ProviderConfig {
    /// AWS provider for a stage and region
    pub fn aws(stage: impl Into<String>, region: impl Into<String>) -> Self {
        Self {
            name: "aws".to_string(),
            stage: stage.into(),
            region: region.into(),
            runtime: None,
            iam_role_statements: Vec::new(),
            environment: BTreeMap::new(),
        }
    }

    pub fn runtime(mut self, runtime: impl Into<String>) -> Self {
        self.runtime = Some(runtime.into());
        self
    }

    pub fn iam_statement(mut self, statement: IamStatement) -> Self {
        self.iam_role_statements.push(statement);
        self
    }

    pub fn env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.environment.insert(key.into(), value.into());
        self
    }
}

/// A cloud resource (table, bucket, queue, ...) provisioned with the service
#[derive(Debug, Clone, PartialEq)]
pub struct ResourceDeclaration {
    pub name: String,
    /// CloudFormation type, e.g. `AWS::DynamoDB::Table`
    pub kind: String,
    pub properties: Map<String, Value>,
}

/// Root descriptor of a deployable unit
///
/// Serialises as the service part of a deployment descriptor: `service`,
/// `provider` and `resources.Resources.<name>.{Type, Properties}`. The
/// handler class list is consumed by the manifest generator and the
/// container, never serialised.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ServiceDescriptor {
    #[serde(rename = "service")]
    pub name: String,
    pub provider: ProviderConfig,
    #[serde(
        skip_serializing_if = "Vec::is_empty",
        serialize_with = "serialize_resources"
    )]
    pub resources: Vec<ResourceDeclaration>,
    #[serde(skip)]
    pub handlers: Vec<ClassId>,
}

impl ServiceDescriptor {
    pub fn new(name: impl Into<String>, provider: ProviderConfig) -> Self {
        Self {
            name: name.into(),
            provider,
            resources: Vec::new(),
            handlers: Vec::new(),
        }
    }

    /// Add a handler class to the service
    pub fn handler(mut self, class: ClassId) -> Self {
        self.handlers.push(class);
        self
    }

    /// Add a handler class identified by its Rust type
    pub fn handler_type<T: ?Sized + 'static>(self) -> Self {
        self.handler(ClassId::of::<T>())
    }

    pub fn resource(mut self, resource: ResourceDeclaration) -> Self {
        self.resources.push(resource);
        self
    }

    pub fn declares_handler(&self, class: ClassId) -> bool {
        self.handlers.contains(&class)
    }
}

#[allow(clippy::ptr_arg)]
fn serialize_resources<S>(resources: &Vec<ResourceDeclaration>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    #[derive(Serialize)]
    struct Resource<'a> {
        #[serde(rename = "Type")]
        kind: &'a str,
        #[serde(rename = "Properties")]
        properties: &'a Map<String, Value>,
    }

    struct Resources<'a>(&'a [ResourceDeclaration]);

    impl Serialize for Resources<'_> {
        fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
            let mut map = serializer.serialize_map(Some(self.0.len()))?;
            for resource in self.0 {
                map.serialize_entry(
                    &resource.name,
                    &Resource {
                        kind: &resource.kind,
                        properties: &resource.properties,
                    },
                )?;
            }
            map.end()
        }
    }

    let mut map = serializer.serialize_map(Some(1))?;
    map.serialize_entry("Resources", &Resources(resources))?;
    map.end()
}
