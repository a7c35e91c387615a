//! Brazilian postal codes (CEP) and address lookup responses.
//!
//! The lookup itself is an HTTP GET against the ViaCEP service; this module
//! only validates the code, builds the URL, and parses the JSON answer.

use serde::Deserialize;
use thiserror::Error;

/// Base URL of the ViaCEP lookup service.
pub const VIACEP_BASE_URL: &str = "https://viacep.com.br/ws";

/// Error type for address lookups.
#[derive(Error, Debug)]
pub enum AddressError {
    /// Input is not an 8 digit postal code.
    #[error("Invalid CEP: {0}")]
    InvalidCep(String),

    /// The service has no address for this code.
    #[error("CEP not found: {0}")]
    NotFound(String),

    /// The response body is not valid JSON.
    #[error("Invalid lookup response: {0}")]
    Parse(#[from] serde_json::Error),
}

impl AddressError {
    /// Message shown to the user.
    #[must_use]
    pub const fn user_message(&self) -> &'static str {
        match self {
            Self::InvalidCep(_) => "CEP inválido.",
            Self::NotFound(_) => "CEP não encontrado.",
            Self::Parse(_) => "Erro ao buscar CEP.",
        }
    }
}

/// Result type alias for address operations.
pub type Result<T> = std::result::Result<T, AddressError>;

/// A validated postal code: exactly 8 digits.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Cep(String);

impl Cep {
    /// Parses `12345678` or `12345-678`. Surrounding whitespace is ignored.
    ///
    /// # Errors
    ///
    /// Returns [`AddressError::InvalidCep`] for anything else.
    pub fn parse(raw: &str) -> Result<Self> {
        let trimmed = raw.trim();
        let digits: String = match trimmed.split_once('-') {
            Some((head, tail)) if head.len() == 5 && tail.len() == 3 => format!("{head}{tail}"),
            Some(_) => return Err(AddressError::InvalidCep(trimmed.to_string())),
            None => trimmed.to_string(),
        };

        if digits.len() == 8 && digits.bytes().all(|b| b.is_ascii_digit()) {
            Ok(Self(digits))
        } else {
            Err(AddressError::InvalidCep(trimmed.to_string()))
        }
    }

    /// The 8 digits.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The code as `12345-678`.
    #[must_use]
    pub fn formatted(&self) -> String {
        format!("{}-{}", &self.0[..5], &self.0[5..])
    }

    /// URL of the JSON lookup for this code.
    #[must_use]
    pub fn lookup_url(&self) -> String {
        format!("{VIACEP_BASE_URL}/{}/json/", self.0)
    }
}

/// Raw ViaCEP answer. Missing fields default to empty.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ViaCepResponse {
    #[serde(default)]
    logradouro: String,
    #[serde(default)]
    bairro: String,
    #[serde(default)]
    localidade: String,
    #[serde(default)]
    uf: String,
    #[serde(default, deserialize_with = "flag")]
    erro: bool,
}

/// ViaCEP reports a miss as `"erro": true` or `"erro": "true"`.
fn flag<'de, D: serde::Deserializer<'de>>(deserializer: D) -> std::result::Result<bool, D::Error> {
    Ok(match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::Bool(b) => b,
        serde_json::Value::String(s) => s == "true",
        _ => false,
    })
}

impl ViaCepResponse {
    /// Parses a lookup response body for `cep`.
    ///
    /// # Errors
    ///
    /// Returns [`AddressError::Parse`] for malformed JSON or
    /// [`AddressError::NotFound`] if the service reported a miss.
    pub fn parse(cep: &Cep, body: &str) -> Result<Address> {
        let response: Self = serde_json::from_str(body)?;
        response.into_address(cep)
    }

    /// Converts into an [`Address`].
    ///
    /// # Errors
    ///
    /// Returns [`AddressError::NotFound`] if the service reported a miss.
    pub fn into_address(self, cep: &Cep) -> Result<Address> {
        if self.erro {
            return Err(AddressError::NotFound(cep.formatted()));
        }
        Ok(Address {
            cep: cep.clone(),
            street: self.logradouro,
            neighborhood: self.bairro,
            city: self.localidade,
            state: self.uf,
        })
    }
}

/// An address found by postal code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Address {
    /// Postal code.
    pub cep: Cep,
    /// Street.
    pub street: String,
    /// Neighborhood.
    pub neighborhood: String,
    /// City.
    pub city: String,
    /// State code (UF).
    pub state: String,
}

impl Address {
    /// One-line form used for the profile address field.
    ///
    /// Empty parts are skipped: `Praça da Sé, Sé, São Paulo - SP, 01001-000`.
    #[must_use]
    pub fn to_line(&self) -> String {
        let city_state = match (self.city.is_empty(), self.state.is_empty()) {
            (false, false) => format!("{} - {}", self.city, self.state),
            (false, true) => self.city.clone(),
            (true, false) => self.state.clone(),
            (true, true) => String::new(),
        };

        [
            self.street.clone(),
            self.neighborhood.clone(),
            city_state,
            self.cep.formatted(),
        ]
        .into_iter()
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(", ")
    }
}
