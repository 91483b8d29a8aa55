use ed25519_dalek::{Verifier, VerifyingKey, PUBLIC_KEY_LENGTH, SECRET_KEY_LENGTH, SIGNATURE_LENGTH};

macro_rules! fixed_bytes {
    ($(#[$meta:meta])* $name:ident, $len:expr) => {
        $(#[$meta])*
        #[derive(Clone, Copy, PartialEq, Eq, Hash)]
        pub struct $name([u8; $len]);

        impl $name {
            /// The width of the buffer in bytes
            pub const LEN: usize = $len;

            /// A reference to the raw bytes
            pub fn as_bytes(&self) -> &[u8; $len] {
                &self.0
            }

            /// The raw bytes
            pub fn to_bytes(self) -> [u8; $len] {
                self.0
            }
        }

        impl From<[u8; $len]> for $name {
            fn from(bytes: [u8; $len]) -> Self {
                Self(bytes)
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(&hex::encode(self.0))
            }
        }

        impl std::str::FromStr for $name {
            type Err = hex::FromHexError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let mut bytes = [0; $len];
                hex::decode_to_slice(s, &mut bytes)?;
                Ok(Self(bytes))
            }
        }

        impl serde::Serialize for $name {
            fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
                where S: serde::Serializer
            {
                serializer.collect_str(self)
            }
        }

        impl<'de> serde::Deserialize<'de> for $name {
            fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
                where D: serde::Deserializer<'de>
            {
                let s = <String as serde::Deserialize>::deserialize(deserializer)?;
                s.parse().map_err(serde::de::Error::custom)
            }
        }
    };
}

fixed_bytes!(
    /// The public key and address of an account
    PublicKey, PUBLIC_KEY_LENGTH
);

fixed_bytes!(
    /// The private key of an account
    ///
    /// Anyone with access to the private key has access to the account.
    PrivateKey, SECRET_KEY_LENGTH
);

fixed_bytes!(
    /// A signature created with the private key of an account
    Signature, SIGNATURE_LENGTH
);

/// The address of an account that is inaccessible
///
/// There is no known private key for this address, so any coin sent to it is
/// permanently unspendable. The validation rules treat it like every other
/// address.
pub const BURN_ADDRESS: PublicKey = PublicKey([0; PUBLIC_KEY_LENGTH]);

impl PublicKey {
    /// Verifies a signature over `data` against this public key
    pub fn verify(&self, data: &[u8], signature: &Signature) -> bool {
        let key = match VerifyingKey::from_bytes(&self.0) {
            Ok(key) => key,
            Err(_) => return false,
        };
        key.verify(data, &ed25519_dalek::Signature::from_bytes(&signature.0))
            .is_ok()
    }
}

impl Signature {
    /// The all-zero signature, denoting "no transactions yet"
    pub const ZERO: Signature = Signature([0; SIGNATURE_LENGTH]);
}

impl std::fmt::Debug for PublicKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "PublicKey({})", self)
    }
}

impl std::fmt::Debug for Signature {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Signature({})", self)
    }
}

impl std::fmt::Debug for PrivateKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("PrivateKey(..)")
    }
}
