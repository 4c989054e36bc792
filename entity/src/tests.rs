//! # 实体定义测试
//!
//! 测试实体定义与枚举存储值的正确性

#[cfg(test)]
mod tests {
    use crate::{
        audit_logs, batches, capa, deviations, documents, monitoring, reports, users, AuditAction,
        CapaStatus, CapaType, DeviationStatus, ReadingStatus,
    };
    use chrono::NaiveDate;
    use sea_orm::{ActiveEnum, EntityName, Set};

    #[tokio::test]
    async fn test_deviation_creation() {
        let deviation = deviations::ActiveModel {
            deviation_number: Set("DEV-2024-0001".to_string()),
            title: Set("温度超限".to_string()),
            description: Set("冷库温度超过上限".to_string()),
            category: Set("Equipment".to_string()),
            severity: Set(5),
            occurrence: Set(4),
            detection: Set(3),
            rpn: Set(60),
            status: Set(DeviationStatus::default()),
            ..Default::default()
        };

        assert_eq!(deviation.deviation_number.as_ref(), "DEV-2024-0001");
        assert_eq!(deviation.rpn.as_ref(), &60);
        assert_eq!(deviation.status.as_ref(), &DeviationStatus::Open);
    }

    #[tokio::test]
    async fn test_capa_creation() {
        let action = capa::ActiveModel {
            capa_number: Set("CAPA-2024-0001".to_string()),
            deviation_id: Set(Some(1)),
            capa_type: Set(CapaType::Corrective),
            target_date: Set(NaiveDate::from_ymd_opt(2024, 6, 30).unwrap()),
            status: Set(CapaStatus::default()),
            ..Default::default()
        };

        assert_eq!(action.deviation_id.as_ref(), &Some(1));
        assert_eq!(action.status.as_ref(), &CapaStatus::Open);
    }

    #[test]
    fn test_enum_storage_values() {
        assert_eq!(DeviationStatus::UnderInvestigation.to_value(), "Under Investigation");
        assert_eq!(DeviationStatus::CapaRequired.to_value(), "CAPA Required");
        assert_eq!(CapaStatus::PendingVerification.to_value(), "Pending Verification");
        assert_eq!(CapaType::Both.to_value(), "Both");
        assert_eq!(ReadingStatus::OutOfSpec.to_value(), "Out of Spec");
        assert_eq!(AuditAction::Delete.to_value(), "DELETE");

        let parsed = DeviationStatus::try_from_value(&"Closed".to_string()).unwrap();
        assert_eq!(parsed, DeviationStatus::Closed);
        assert!(CapaStatus::try_from_value(&"Done".to_string()).is_err());
    }

    #[test]
    fn test_enum_json_labels_match_storage() {
        let json = serde_json::to_string(&CapaStatus::InProgress).unwrap();
        assert_eq!(json, "\"In Progress\"");

        let status: ReadingStatus = serde_json::from_str("\"Out of Spec\"").unwrap();
        assert_eq!(status, ReadingStatus::OutOfSpec);

        let action: AuditAction = serde_json::from_str("\"UPDATE\"").unwrap();
        assert_eq!(action, AuditAction::Update);
    }

    #[test]
    fn test_closed_on_time() {
        let now = chrono::Utc::now().naive_utc();
        let target = NaiveDate::from_ymd_opt(2024, 3, 31).unwrap();
        let mut model = capa::Model {
            id: 1,
            capa_number: "CAPA-2024-0001".to_string(),
            deviation_id: None,
            capa_type: CapaType::Preventive,
            title: "t".to_string(),
            description: "d".to_string(),
            root_cause: None,
            action_plan: "p".to_string(),
            responsible_person: "QA".to_string(),
            target_date: target,
            completion_date: None,
            status: CapaStatus::Closed,
            effectiveness: None,
            verification_date: None,
            created_at: now,
            updated_at: now,
            created_by: None,
        };
        assert_eq!(model.closed_on_time(), None);

        model.completion_date = Some(target);
        assert_eq!(model.closed_on_time(), Some(true));

        model.completion_date = target.succ_opt();
        assert_eq!(model.closed_on_time(), Some(false));
    }

    #[test]
    fn test_all_entities_compile() {
        assert_eq!(users::Entity.table_name(), "users");
        assert_eq!(deviations::Entity.table_name(), "deviations");
        assert_eq!(capa::Entity.table_name(), "capa");
        assert_eq!(monitoring::Entity.table_name(), "monitoring");
        assert_eq!(batches::Entity.table_name(), "batches");
        assert_eq!(reports::Entity.table_name(), "reports");
        assert_eq!(documents::Entity.table_name(), "documents");
        assert_eq!(audit_logs::Entity.table_name(), "audit_logs");
    }
}
