//! Uniform row view model handed to the presentation layer.

use serde::Serialize;

use kycdesk_core::{ApprovalStatus, FieldKey, Registrant, StatusCache};

/// One verifiable field cell: the display value paired with its latest
/// known approval status.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct FieldCell {
    pub field: FieldKey,
    pub value: String,
    pub status: ApprovalStatus,
}

/// One table row: the registrant snapshot plus a cell per verifiable
/// field, in schema order. Updating one field's status only changes
/// that cell on the next rebuild; siblings are untouched.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct RegistrantRow {
    pub registrant: Registrant,
    pub cells: Vec<FieldCell>,
}

impl RegistrantRow {
    pub fn build(registrant: &Registrant, statuses: &StatusCache) -> Self {
        let cells = FieldKey::ALL
            .iter()
            .map(|&field| FieldCell {
                field,
                value: registrant.field_summary(field),
                status: statuses.status(&registrant.id, field),
            })
            .collect();
        Self { registrant: registrant.clone(), cells }
    }

    pub fn cell(&self, field: FieldKey) -> &FieldCell {
        self.cells
            .iter()
            .find(|cell| cell.field == field)
            .unwrap_or_else(|| unreachable!("rows carry a cell for every field key"))
    }
}

#[cfg(test)]
mod tests {
    use super::RegistrantRow;
    use kycdesk_core::domain::kyc::KycDocuments;
    use kycdesk_core::{
        ApprovalState, FieldKey, FieldValue, Registrant, RegistrantId, RegistrantType, StatusCache,
    };

    fn fleet_owner() -> Registrant {
        Registrant {
            id: RegistrantId("fo-1".to_owned()),
            registration_id: FieldValue::Present("FLT-0001".to_owned()),
            registrant_type: RegistrantType::FleetOwner,
            display_name: "Shakti Fleet Services".to_owned(),
            phone_number: FieldValue::Present("+919800000002".to_owned()),
            email: FieldValue::NotApplicable,
            address: FieldValue::Present("Plot 4, Baner".to_owned()),
            ambulance_category: None,
            vehicle_number: FieldValue::Present("MH14XY9921".to_owned()),
            is_email_verified: false,
            is_phone_number_verified: true,
            kyc_stage: FieldValue::Present("ACTIVE".to_owned()),
            submitted_at: None,
            last_updated_at: None,
            kyc: KycDocuments::default(),
        }
    }

    #[test]
    fn row_has_a_cell_for_every_field_in_schema_order() {
        let row = RegistrantRow::build(&fleet_owner(), &StatusCache::new());
        assert_eq!(row.cells.len(), FieldKey::ALL.len());
        let order: Vec<FieldKey> = row.cells.iter().map(|cell| cell.field).collect();
        assert_eq!(order, FieldKey::ALL.to_vec());
    }

    #[test]
    fn missing_fields_render_the_sentinel_without_panicking() {
        let row = RegistrantRow::build(&fleet_owner(), &StatusCache::new());
        assert_eq!(row.cell(FieldKey::Email).value, "N/A");
        assert_eq!(row.cell(FieldKey::AmbulanceCategory).value, "N/A");
        assert_eq!(row.cell(FieldKey::Email).status.state, ApprovalState::Pending);
    }
}
