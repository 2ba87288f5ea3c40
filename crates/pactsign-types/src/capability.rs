//! Capability types.
//!
//! A capability is a scoped permission a signer grants to one command. The
//! signed payload only carries the `{name, args}` reference; `role` and
//! `description` exist so a wallet can show the user what they approve.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A permission a signer grants to a command.
///
/// Serializes in the wallet shape. Deserializes from the wallet shape, the
/// flat `{role, description, name, args}` shape or a bare `{name, args}`
/// clist entry (which leaves `role` and `description` empty).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "CapabilityInput", into = "WalletCapability")]
pub struct Capability {
    /// Short label shown to the user.
    pub role: String,
    /// Human-readable explanation.
    pub description: String,
    /// Fully qualified capability name, e.g. `coin.TRANSFER`.
    pub name: String,
    /// Positional arguments.
    pub args: Vec<Value>,
}

impl Capability {
    pub fn new(
        role: impl Into<String>,
        description: impl Into<String>,
        name: impl Into<String>,
        args: Vec<Value>,
    ) -> Self {
        Self {
            role: role.into(),
            description: description.into(),
            name: name.into(),
            args,
        }
    }

    /// The `{name, args}` part that ends up in a signer's clist.
    pub fn to_ref(&self) -> CapabilityRef {
        CapabilityRef {
            name: self.name.clone(),
            args: self.args.clone(),
        }
    }
}

/// A capability as it appears inside a signed command.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CapabilityRef {
    pub name: String,
    pub args: Vec<Value>,
}

/// Wallet wire shape: `{role, description, cap: {name, args}}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct WalletCapability {
    role: String,
    description: String,
    cap: CapabilityRef,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum CapabilityInput {
    Wallet(WalletCapability),
    Flat {
        #[serde(default)]
        role: String,
        #[serde(default)]
        description: String,
        name: String,
        args: Vec<Value>,
    },
}

impl From<CapabilityInput> for Capability {
    fn from(input: CapabilityInput) -> Self {
        match input {
            CapabilityInput::Wallet(w) => Self {
                role: w.role,
                description: w.description,
                name: w.cap.name,
                args: w.cap.args,
            },
            CapabilityInput::Flat {
                role,
                description,
                name,
                args,
            } => Self {
                role,
                description,
                name,
                args,
            },
        }
    }
}

impl From<Capability> for WalletCapability {
    fn from(c: Capability) -> Self {
        Self {
            role: c.role,
            description: c.description,
            cap: CapabilityRef {
                name: c.name,
                args: c.args,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn transfer() -> Capability {
        Capability::new(
            "Transfer",
            "Allow moving 1.5 KDA",
            "coin.TRANSFER",
            vec![json!("alice"), json!("bob"), json!(1.5)],
        )
    }

    #[test]
    fn test_wallet_shape() {
        let v = serde_json::to_value(transfer()).unwrap();
        assert_eq!(
            v,
            json!({
                "role": "Transfer",
                "description": "Allow moving 1.5 KDA",
                "cap": {"name": "coin.TRANSFER", "args": ["alice", "bob", 1.5]}
            })
        );
        let back: Capability = serde_json::from_value(v).unwrap();
        assert_eq!(back, transfer());
    }

    #[test]
    fn test_flat_and_ref_shapes_accepted() {
        let flat: Capability = serde_json::from_value(json!({
            "role": "Transfer",
            "description": "Allow moving 1.5 KDA",
            "name": "coin.TRANSFER",
            "args": ["alice", "bob", 1.5],
        }))
        .unwrap();
        assert_eq!(flat, transfer());

        let bare: Capability =
            serde_json::from_value(json!({"name": "coin.GAS", "args": []})).unwrap();
        assert_eq!(bare, Capability::new("", "", "coin.GAS", vec![]));
    }

    #[test]
    fn test_shapeless_capability_rejected() {
        assert!(serde_json::from_value::<Capability>(json!({"role": "Gas"})).is_err());
        assert!(serde_json::from_value::<Capability>(json!("coin.GAS")).is_err());
    }

    #[test]
    fn test_ref_keeps_arg_order() {
        let r = transfer().to_ref();
        assert_eq!(
            serde_json::to_string(&r).unwrap(),
            r#"{"name":"coin.TRANSFER","args":["alice","bob",1.5]}"#
        );
    }
}
