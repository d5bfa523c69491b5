use serde::{Deserialize, Serialize};

/// One property record from the listings catalog.
///
/// Immutable once retrieved; sessions keep snapshot copies that stay valid
/// independently of the backing store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Listing {
    pub id: i64,
    pub name: String,
    pub province: Option<String>,
    pub canton: Option<String>,
    pub district: Option<String>,
    pub property_type: Option<String>,
    pub offer_type: Option<String>,
    pub price_usd: Option<f64>,
    pub price_local: Option<f64>,
    pub bedrooms: Option<u32>,
    pub bathrooms: Option<u32>,
    pub built_area_m2: Option<f64>,
    pub lot_area_m2: Option<f64>,
    pub image_url: Option<String>,
    pub source_url: Option<String>,
    pub bank_name: Option<String>,
    pub agent_name: Option<String>,
    pub agent_phone: Option<String>,
}

impl Listing {
    pub fn new(id: i64, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            province: None,
            canton: None,
            district: None,
            property_type: None,
            offer_type: None,
            price_usd: None,
            price_local: None,
            bedrooms: None,
            bathrooms: None,
            built_area_m2: None,
            lot_area_m2: None,
            image_url: None,
            source_url: None,
            bank_name: None,
            agent_name: None,
            agent_phone: None,
        }
    }

    /// "district, canton, province", skipping missing parts.
    pub fn location(&self) -> String {
        [&self.district, &self.canton, &self.province]
            .iter()
            .filter_map(|part| part.as_deref())
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// Formatted USD price, or a placeholder when the catalog has none.
    pub fn price_display(&self) -> String {
        match self.price_usd {
            Some(price) => format!("USD {}", format_thousands(price)),
            None => "Precio no disponible".into(),
        }
    }

    /// One line for numbered search results.
    pub fn summary_line(&self) -> String {
        let place = [&self.canton, &self.province]
            .iter()
            .filter_map(|part| part.as_deref())
            .collect::<Vec<_>>()
            .join(", ");
        let link = self
            .source_url
            .as_deref()
            .map(|url| format!(" | [Ver en web]({url})"))
            .unwrap_or_default();
        format!("**{}** | {} | {}{}", self.name, place, self.price_display(), link)
    }

    /// Bulleted catalog facts, used as grounding material for prose answers.
    pub fn detail_block(&self) -> String {
        let mut lines = vec![format!("• Nombre: {}", self.name)];

        let location = self.location();
        if !location.is_empty() {
            lines.push(format!("• Ubicación: {location}"));
        }
        if let Some(price) = self.price_usd {
            lines.push(format!("• Precio: USD {}", format_thousands(price)));
        } else if let Some(price) = self.price_local {
            lines.push(format!("• Precio local: {}", format_thousands(price)));
        }
        if let Some(kind) = &self.property_type {
            lines.push(format!("• Tipo: {kind}"));
        }
        if let Some(rooms) = self.bedrooms {
            lines.push(format!("• Habitaciones: {rooms}"));
        }
        if let Some(baths) = self.bathrooms {
            lines.push(format!("• Baños: {baths}"));
        }
        if let Some(area) = self.built_area_m2 {
            lines.push(format!("• Área construcción: {area} m²"));
        }
        if let Some(area) = self.lot_area_m2 {
            lines.push(format!("• Tamaño lote: {area} m²"));
        }
        if let Some(bank) = &self.bank_name {
            lines.push(format!("• **Banco/Entidad**: {bank}"));
        }
        if let Some(offer) = &self.offer_type {
            lines.push(format!("• Tipo de oferta: {offer}"));
        }
        if let Some(agent) = &self.agent_name {
            lines.push(format!("• **Agente a cargo**: {agent}"));
            if let Some(phone) = &self.agent_phone {
                lines.push(format!("• **Teléfono del agente**: {phone}"));
            }
        }
        lines.join("\n")
    }
}

/// Integer part with thousands separators: 144914.0 -> "144,914".
pub fn format_thousands(value: f64) -> String {
    let whole = value.round() as i64;
    let digits = whole.abs().to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    if whole < 0 {
        format!("-{out}")
    } else {
        out
    }
}
