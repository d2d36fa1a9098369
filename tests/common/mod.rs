//! Shared test fixtures: a small Customer/Address/Order model graph, its
//! type descriptors, and scriptable rule-sets.

#![allow(dead_code)]

use async_trait::async_trait;
use formbind::{
    DescriptorRegistry, MemberValue, ModelNode, ModelRef, RuleContext, RuleFailure, RuleSet,
    RuleSetError, TypeDescriptor,
};
use std::sync::{Arc, OnceLock};
use std::time::{Duration, Instant};

// ── Fixture model graph ──────────────────────────────────────────

pub struct Customer {
    pub name: String,
    pub address: Option<Arc<Address>>,
    pub orders: Vec<Arc<Order>>,
}

pub struct Address {
    pub city: String,
    pub street: String,
    pub geo: Option<Arc<GeoPoint>>,
    pub phone_numbers: Vec<Arc<Phone>>,
}

pub struct GeoPoint {
    pub lat: f64,
    pub lon: f64,
}

pub struct Order {
    pub total: f64,
}

pub struct Phone {
    pub number: String,
}

static CUSTOMER_DESC: OnceLock<TypeDescriptor> = OnceLock::new();
static ADDRESS_DESC: OnceLock<TypeDescriptor> = OnceLock::new();
static GEO_DESC: OnceLock<TypeDescriptor> = OnceLock::new();
static ORDER_DESC: OnceLock<TypeDescriptor> = OnceLock::new();
static PHONE_DESC: OnceLock<TypeDescriptor> = OnceLock::new();

pub fn customer_descriptor() -> &'static TypeDescriptor {
    CUSTOMER_DESC.get_or_init(|| {
        TypeDescriptor::new("Customer")
            .scalar("Name")
            .object("Address", "Address")
            .list("Orders", "Order")
    })
}

pub fn address_descriptor() -> &'static TypeDescriptor {
    ADDRESS_DESC.get_or_init(|| {
        TypeDescriptor::new("Address")
            .scalar("City")
            .scalar("Street")
            .object("Geo", "GeoPoint")
            .list("PhoneNumbers", "Phone")
    })
}

pub fn geo_descriptor() -> &'static TypeDescriptor {
    GEO_DESC.get_or_init(|| TypeDescriptor::new("GeoPoint").scalar("Lat").scalar("Lon"))
}

pub fn order_descriptor() -> &'static TypeDescriptor {
    ORDER_DESC.get_or_init(|| TypeDescriptor::new("Order").scalar("Total"))
}

pub fn phone_descriptor() -> &'static TypeDescriptor {
    PHONE_DESC.get_or_init(|| TypeDescriptor::new("Phone").scalar("Number"))
}

impl ModelNode for Customer {
    fn descriptor(&self) -> &'static TypeDescriptor {
        customer_descriptor()
    }

    fn member(&self, name: &str) -> Option<MemberValue> {
        match name {
            "Name" => Some(MemberValue::Scalar),
            "Address" => Some(MemberValue::Object(
                self.address.as_ref().map(|a| a.clone() as ModelRef),
            )),
            "Orders" => Some(MemberValue::List(
                self.orders.iter().map(|o| o.clone() as ModelRef).collect(),
            )),
            _ => None,
        }
    }
}

impl ModelNode for Address {
    fn descriptor(&self) -> &'static TypeDescriptor {
        address_descriptor()
    }

    fn member(&self, name: &str) -> Option<MemberValue> {
        match name {
            "City" | "Street" => Some(MemberValue::Scalar),
            "Geo" => Some(MemberValue::Object(
                self.geo.as_ref().map(|g| g.clone() as ModelRef),
            )),
            "PhoneNumbers" => Some(MemberValue::List(
                self.phone_numbers
                    .iter()
                    .map(|p| p.clone() as ModelRef)
                    .collect(),
            )),
            _ => None,
        }
    }
}

impl ModelNode for GeoPoint {
    fn descriptor(&self) -> &'static TypeDescriptor {
        geo_descriptor()
    }

    fn member(&self, name: &str) -> Option<MemberValue> {
        match name {
            "Lat" | "Lon" => Some(MemberValue::Scalar),
            _ => None,
        }
    }
}

impl ModelNode for Order {
    fn descriptor(&self) -> &'static TypeDescriptor {
        order_descriptor()
    }

    fn member(&self, name: &str) -> Option<MemberValue> {
        match name {
            "Total" => Some(MemberValue::Scalar),
            _ => None,
        }
    }
}

impl ModelNode for Phone {
    fn descriptor(&self) -> &'static TypeDescriptor {
        phone_descriptor()
    }

    fn member(&self, name: &str) -> Option<MemberValue> {
        match name {
            "Number" => Some(MemberValue::Scalar),
            _ => None,
        }
    }
}

/// Registry holding every fixture descriptor.
pub fn registry() -> DescriptorRegistry {
    let mut registry = DescriptorRegistry::new();
    registry.register(customer_descriptor());
    registry.register(address_descriptor());
    registry.register(geo_descriptor());
    registry.register(order_descriptor());
    registry.register(phone_descriptor());
    registry
}

/// A customer with an address and two orders.
pub fn sample_customer() -> Arc<Customer> {
    Arc::new(Customer {
        name: "Ada".into(),
        address: Some(Arc::new(Address {
            city: "Springfield".into(),
            street: "Main St".into(),
            geo: None,
            phone_numbers: vec![],
        })),
        orders: vec![
            Arc::new(Order { total: 100.0 }),
            Arc::new(Order { total: 250.5 }),
        ],
    })
}

/// A customer whose address has never been entered.
pub fn customer_without_address() -> Arc<Customer> {
    Arc::new(Customer {
        name: "Grace".into(),
        address: None,
        orders: vec![],
    })
}

// ── Scriptable rule-sets ─────────────────────────────────────────

/// A rule-set that reports a fixed list of failures, each targeting one
/// member, honoring the context's member restriction.
#[derive(Default)]
pub struct StaticRules {
    entries: Vec<(&'static str, RuleFailure)>,
}

impl StaticRules {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a failure reported when rules for `member` are selected.
    pub fn with(mut self, member: &'static str, path: &str, message: &str) -> Self {
        self.entries.push((member, RuleFailure::new(path, message)));
        self
    }
}

#[async_trait]
impl RuleSet for StaticRules {
    async fn run(&self, ctx: &RuleContext) -> Result<Vec<RuleFailure>, RuleSetError> {
        Ok(self
            .entries
            .iter()
            .filter(|(member, _)| ctx.applies_to(member))
            .map(|(_, failure)| failure.clone())
            .collect())
    }
}

/// A rule-set that always faults.
pub struct FaultingRules {
    pub message: &'static str,
}

#[async_trait]
impl RuleSet for FaultingRules {
    async fn run(&self, _ctx: &RuleContext) -> Result<Vec<RuleFailure>, RuleSetError> {
        Err(RuleSetError::new(self.message))
    }
}

// ── Async test helpers ───────────────────────────────────────────

/// Polls `condition` until it holds or the deadline passes. Returns the
/// condition's final value.
pub async fn wait_until(deadline: Duration, condition: impl Fn() -> bool) -> bool {
    let start = Instant::now();
    while start.elapsed() < deadline {
        if condition() {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    condition()
}
