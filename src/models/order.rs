use serde::{Deserialize, Serialize};

/// Status given to orders created or edited without one.
pub const DEFAULT_STATUS: &str = "Pendiente";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Order {
    pub id: i32,
    pub fecha: String,
    pub cliente: String,
    pub contacto: Option<String>,
    pub equipo: String,
    pub marca: Option<String>,
    pub modelo: Option<String>,
    pub falla: Option<String>,
    pub diagnostico: String,
    pub trabajo: Option<String>,
    pub estado: String,
    pub tecnico_id: Option<i32>,
    pub created_at: String,
    pub updated_at: String,
}

impl Order {
    /// Case-sensitive substring match over client, equipment and status.
    /// A blank query matches everything.
    #[must_use]
    pub fn matches(&self, query: &str) -> bool {
        let query = query.trim();
        query.is_empty()
            || self.cliente.contains(query)
            || self.equipo.contains(query)
            || self.estado.contains(query)
    }
}

/// Raw order form as submitted by the browser.
///
/// Every field defaults to empty so a missing input behaves like a blank
/// one. `tecnico_id` is only honored when an admin creates an order.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct OrderForm {
    pub fecha: String,
    pub cliente: String,
    pub contacto: String,
    pub equipo: String,
    pub marca: String,
    pub modelo: String,
    pub falla: String,
    pub diagnostico: String,
    pub trabajo: String,
    pub estado: Option<String>,
    pub tecnico_id: Option<String>,
}

/// Trimmed order fields that passed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderFields {
    pub fecha: String,
    pub cliente: String,
    pub contacto: Option<String>,
    pub equipo: String,
    pub marca: Option<String>,
    pub modelo: Option<String>,
    pub falla: Option<String>,
    pub diagnostico: String,
    pub trabajo: Option<String>,
    pub estado: String,
}

impl OrderForm {
    /// Trims every field and checks the required ones.
    ///
    /// # Errors
    ///
    /// Returns the user-facing message when `fecha`, `cliente`, `equipo` or
    /// `diagnostico` is blank.
    pub fn validate(&self) -> Result<OrderFields, String> {
        let fecha = self.fecha.trim();
        let cliente = self.cliente.trim();
        let equipo = self.equipo.trim();
        let diagnostico = self.diagnostico.trim();

        if fecha.is_empty() || cliente.is_empty() || equipo.is_empty() || diagnostico.is_empty() {
            return Err("Por favor completa todos los campos obligatorios".to_string());
        }

        let estado = self
            .estado
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .unwrap_or(DEFAULT_STATUS);

        Ok(OrderFields {
            fecha: fecha.to_string(),
            cliente: cliente.to_string(),
            contacto: optional(&self.contacto),
            equipo: equipo.to_string(),
            marca: optional(&self.marca),
            modelo: optional(&self.modelo),
            falla: optional(&self.falla),
            diagnostico: diagnostico.to_string(),
            trabajo: optional(&self.trabajo),
            estado: estado.to_string(),
        })
    }

    /// Parses the technician selector; blank means unassigned.
    ///
    /// # Errors
    ///
    /// Returns a message when the value is not a positive integer.
    pub fn technician_id(&self) -> Result<Option<i32>, String> {
        match self.tecnico_id.as_deref().map(str::trim) {
            None | Some("") => Ok(None),
            Some(raw) => raw
                .parse::<i32>()
                .ok()
                .filter(|id| *id > 0)
                .map(Some)
                .ok_or_else(|| format!("Técnico inválido: {raw}")),
        }
    }
}

fn optional(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}
