use serde::{Deserialize, Serialize, Serializer};

#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GreetingPayload {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub subtitle: Option<String>,
}

/// View model for a single wallet card.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AccountViewModel {
    pub account_id: String,
    #[serde(default)]
    pub name: String,
    /// Preformatted balance string.
    #[serde(default)]
    pub balance: String,
}

impl AccountViewModel {
    pub fn new(account_id: impl Into<String>) -> Self {
        Self {
            account_id: account_id.into(),
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SnapshotPayload {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub value: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DisclosuresPayload {
    #[serde(default)]
    pub lines: Vec<String>,
}

/// A single dashboard item.
///
/// Deserializes from internally tagged JSON such as
/// `{"kind": "wallet", "account_id": "456"}`; an unknown `kind` is rejected
/// while the module is being read rather than when it is laid out.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Module {
    Greeting(GreetingPayload),
    Wallet(AccountViewModel),
    Snapshot(SnapshotPayload),
    Disclosures(DisclosuresPayload),
}

/// Variant tag of a [`Module`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModuleKind {
    Greeting,
    Wallet,
    Snapshot,
    Disclosures,
}

impl ModuleKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ModuleKind::Greeting => "greeting",
            ModuleKind::Wallet => "wallet",
            ModuleKind::Snapshot => "snapshot",
            ModuleKind::Disclosures => "disclosures",
        }
    }
}

impl std::fmt::Display for ModuleKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Identity of a module for diffing. Payload fields that do not take part
/// in layout are not part of the identity.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ModuleId {
    Greeting,
    Wallet(String),
    Snapshot,
    Disclosures,
}

impl std::fmt::Display for ModuleId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ModuleId::Greeting => f.write_str("greeting"),
            ModuleId::Wallet(account_id) => write!(f, "wallet:{account_id}"),
            ModuleId::Snapshot => f.write_str("snapshot"),
            ModuleId::Disclosures => f.write_str("disclosures"),
        }
    }
}

impl Serialize for ModuleId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl Module {
    pub fn greeting(title: impl Into<String>) -> Self {
        Module::Greeting(GreetingPayload {
            title: title.into(),
            subtitle: None,
        })
    }

    pub fn wallet(account_id: impl Into<String>) -> Self {
        Module::Wallet(AccountViewModel::new(account_id))
    }

    pub fn snapshot(title: impl Into<String>, value: impl Into<String>) -> Self {
        Module::Snapshot(SnapshotPayload {
            title: title.into(),
            value: value.into(),
        })
    }

    pub fn disclosures<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Module::Disclosures(DisclosuresPayload {
            lines: lines.into_iter().map(Into::into).collect(),
        })
    }

    pub fn kind(&self) -> ModuleKind {
        match self {
            Module::Greeting(_) => ModuleKind::Greeting,
            Module::Wallet(_) => ModuleKind::Wallet,
            Module::Snapshot(_) => ModuleKind::Snapshot,
            Module::Disclosures(_) => ModuleKind::Disclosures,
        }
    }

    /// Account identifier of a wallet module.
    pub fn account_id(&self) -> Option<&str> {
        match self {
            Module::Wallet(account) => Some(&account.account_id),
            Module::Greeting(_) | Module::Snapshot(_) | Module::Disclosures(_) => None,
        }
    }

    pub fn id(&self) -> ModuleId {
        match self {
            Module::Greeting(_) => ModuleId::Greeting,
            Module::Wallet(account) => ModuleId::Wallet(account.account_id.clone()),
            Module::Snapshot(_) => ModuleId::Snapshot,
            Module::Disclosures(_) => ModuleId::Disclosures,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn identity_ignores_payload() {
        let a = Module::Wallet(AccountViewModel {
            account_id: "1".into(),
            name: "Checking".into(),
            balance: "$10".into(),
        });
        let b = Module::Wallet(AccountViewModel {
            account_id: "1".into(),
            name: "Checking".into(),
            balance: "$12".into(),
        });
        assert_eq!(a.id(), b.id());
        assert_ne!(a, b);
        assert_ne!(a.id(), Module::wallet("2").id());
    }

    #[test]
    fn reads_tagged_json() {
        let module: Module =
            serde_json::from_value(json!({ "kind": "wallet", "account_id": "456" })).unwrap();
        assert_eq!(module.kind(), ModuleKind::Wallet);
        assert_eq!(module.account_id(), Some("456"));

        let module: Module = serde_json::from_value(json!({ "kind": "greeting" })).unwrap();
        assert_eq!(module.id(), ModuleId::Greeting);
        assert_eq!(module.account_id(), None);
    }

    #[test]
    fn unknown_kind_is_rejected() {
        let result = serde_json::from_value::<Module>(json!({ "kind": "weather" }));
        assert!(result.is_err());
    }

    #[test]
    fn id_serializes_as_label() {
        let json = serde_json::to_string(&ModuleId::Wallet("456".into())).unwrap();
        assert_eq!(json, "\"wallet:456\"");
    }
}
