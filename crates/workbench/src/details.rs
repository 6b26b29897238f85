//! On-demand resolution of the structured payload shown when an
//! operator opens a field.

use kycdesk_core::{FieldDetailPayload, FieldKey, Registrant, RegistrantDirectory};

/// Resolve the display payload for one field of one registrant.
///
/// Most fields are served from the sub-documents already embedded in
/// the registrant snapshot. Registration-certificate details are
/// enriched by a secondary lookup keyed on the vehicle registration
/// number; any enrichment failure falls back to the embedded data so
/// the approval workflow stays usable.
pub async fn resolve<D>(directory: &D, registrant: &Registrant, field: FieldKey) -> FieldDetailPayload
where
    D: RegistrantDirectory,
{
    match field {
        FieldKey::AadhaarDetails => registrant
            .kyc
            .aadhaar_detail
            .clone()
            .map(FieldDetailPayload::Aadhaar)
            .unwrap_or_else(|| plain(registrant, field)),
        FieldKey::PanDetails => registrant
            .kyc
            .pan_detail
            .clone()
            .map(FieldDetailPayload::Pan)
            .unwrap_or_else(|| plain(registrant, field)),
        FieldKey::DlDetails => registrant
            .kyc
            .dl_detail
            .clone()
            .map(FieldDetailPayload::Dl)
            .unwrap_or_else(|| plain(registrant, field)),
        FieldKey::BankDetails => registrant
            .kyc
            .bank_detail
            .clone()
            .map(FieldDetailPayload::Bank)
            .unwrap_or_else(|| plain(registrant, field)),
        FieldKey::RcDetails => resolve_rc(directory, registrant).await,
        FieldKey::Email | FieldKey::Address | FieldKey::AmbulanceCategory => {
            plain(registrant, field)
        }
    }
}

async fn resolve_rc<D>(directory: &D, registrant: &Registrant) -> FieldDetailPayload
where
    D: RegistrantDirectory,
{
    let embedded = registrant.kyc.rc_detail.clone();
    let reg_no = embedded
        .as_ref()
        .and_then(|detail| detail.reg_no.clone())
        .or_else(|| {
            registrant
                .vehicle_number
                .is_applicable()
                .then(|| registrant.vehicle_number.as_display().to_owned())
        });

    if let Some(reg_no) = reg_no {
        match directory.rc_detail(registrant.registrant_type, &reg_no).await {
            Ok(Some(detail)) => return FieldDetailPayload::Rc(detail),
            Ok(None) => {
                tracing::debug!(%reg_no, "no enriched rc record; using embedded data");
            }
            Err(error) => {
                tracing::warn!(%reg_no, error = %error, "rc enrichment failed; using embedded data");
            }
        }
    }

    embedded
        .map(FieldDetailPayload::Rc)
        .unwrap_or_else(|| plain(registrant, FieldKey::RcDetails))
}

fn plain(registrant: &Registrant, field: FieldKey) -> FieldDetailPayload {
    FieldDetailPayload::Plain {
        label: field.label().to_owned(),
        value: registrant.field_summary(field),
    }
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;

    use super::resolve;
    use kycdesk_core::domain::kyc::{AadhaarDetail, KycDocuments, RcDetail};
    use kycdesk_core::{
        FetchError, FieldDetailPayload, FieldKey, FieldValue, PageQuery, Registrant,
        RegistrantDirectory, RegistrantId, RegistrantPage, RegistrantType,
    };

    struct FakeDirectory {
        rc: Result<Option<RcDetail>, FetchError>,
    }

    #[async_trait]
    impl RegistrantDirectory for FakeDirectory {
        async fn fetch_page(&self, _query: &PageQuery) -> Result<RegistrantPage, FetchError> {
            Ok(RegistrantPage::default())
        }

        async fn rc_detail(
            &self,
            _registrant_type: RegistrantType,
            _reg_no: &str,
        ) -> Result<Option<RcDetail>, FetchError> {
            self.rc.clone()
        }
    }

    fn registrant(kyc: KycDocuments) -> Registrant {
        Registrant {
            id: RegistrantId("drv-1".to_owned()),
            registration_id: FieldValue::Present("AMB-001".to_owned()),
            registrant_type: RegistrantType::Driver,
            display_name: "Ravi Kumar".to_owned(),
            phone_number: FieldValue::Present("+919800000001".to_owned()),
            email: FieldValue::Present("ravi@example.in".to_owned()),
            address: FieldValue::Present("12 MG Road".to_owned()),
            ambulance_category: None,
            vehicle_number: FieldValue::Present("MH12AB1234".to_owned()),
            is_email_verified: true,
            is_phone_number_verified: true,
            kyc_stage: FieldValue::Present("UNDER_REVIEW".to_owned()),
            submitted_at: None,
            last_updated_at: None,
            kyc,
        }
    }

    fn enriched_rc() -> RcDetail {
        RcDetail {
            reg_no: Some("MH12AB1234".to_owned()),
            owner: Some("Ravi Kumar".to_owned()),
            vehicle_model: Some("Force Traveller".to_owned()),
            ..RcDetail::default()
        }
    }

    #[tokio::test]
    async fn embedded_aadhaar_resolves_without_a_fetch() {
        let directory = FakeDirectory { rc: Ok(None) };
        let kyc = KycDocuments {
            aadhaar_detail: Some(AadhaarDetail {
                aadhar_number: Some("XXXX-1234".to_owned()),
                ..AadhaarDetail::default()
            }),
            ..KycDocuments::default()
        };

        let payload = resolve(&directory, &registrant(kyc), FieldKey::AadhaarDetails).await;
        assert!(matches!(
            payload,
            FieldDetailPayload::Aadhaar(detail) if detail.aadhar_number.as_deref() == Some("XXXX-1234")
        ));
    }

    #[tokio::test]
    async fn rc_prefers_the_enriched_lookup() {
        let directory = FakeDirectory { rc: Ok(Some(enriched_rc())) };

        let payload = resolve(&directory, &registrant(KycDocuments::default()), FieldKey::RcDetails)
            .await;
        assert!(matches!(
            payload,
            FieldDetailPayload::Rc(detail) if detail.vehicle_model.as_deref() == Some("Force Traveller")
        ));
    }

    #[tokio::test]
    async fn rc_falls_back_to_embedded_data_when_enrichment_fails() {
        let directory =
            FakeDirectory { rc: Err(FetchError::Transport("timeout".to_owned())) };
        let kyc = KycDocuments {
            rc_detail: Some(RcDetail {
                reg_no: Some("MH12AB1234".to_owned()),
                rc_status: Some("ACTIVE".to_owned()),
                ..RcDetail::default()
            }),
            ..KycDocuments::default()
        };

        let payload = resolve(&directory, &registrant(kyc), FieldKey::RcDetails).await;
        assert!(matches!(
            payload,
            FieldDetailPayload::Rc(detail) if detail.rc_status.as_deref() == Some("ACTIVE")
        ));
    }

    #[tokio::test]
    async fn rc_without_any_data_degrades_to_the_plain_cell() {
        let directory = FakeDirectory { rc: Ok(None) };
        let mut subject = registrant(KycDocuments::default());
        subject.vehicle_number = FieldValue::NotApplicable;

        let payload = resolve(&directory, &subject, FieldKey::RcDetails).await;
        assert_eq!(
            payload,
            FieldDetailPayload::Plain {
                label: "Registration Certificate Details".to_owned(),
                value: "N/A".to_owned(),
            }
        );
    }

    #[tokio::test]
    async fn simple_fields_resolve_to_their_cell_value() {
        let directory = FakeDirectory { rc: Ok(None) };
        let payload =
            resolve(&directory, &registrant(KycDocuments::default()), FieldKey::Email).await;
        assert_eq!(
            payload,
            FieldDetailPayload::Plain {
                label: "Email ID".to_owned(),
                value: "ravi@example.in".to_owned(),
            }
        );
    }
}
