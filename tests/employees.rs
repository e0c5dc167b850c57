#[cfg(test)]
mod tests {
    use leavedesk::db::balances::{current_year, BalanceKind, Balances};
    use leavedesk::db::db::Db;
    use leavedesk::db::employees::NewEmployee;
    use leavedesk::libs::config::LedgerConfig;
    use leavedesk::libs::employee::EmployeeService;
    use leavedesk::libs::error::LedgerError;
    use tempfile::TempDir;
    use test_context::{test_context, TestContext};

    struct EmployeeTestContext {
        _temp_dir: TempDir,
        db: Db,
    }

    impl TestContext for EmployeeTestContext {
        fn setup() -> Self {
            let temp_dir = tempfile::tempdir().unwrap();
            let db = Db::open(&temp_dir.path().join("leavedesk.db")).unwrap();
            EmployeeTestContext { _temp_dir: temp_dir, db }
        }
    }

    fn new_employee(email: &str) -> NewEmployee {
        NewEmployee {
            first_name: "John".to_string(),
            surname: "Doe".to_string(),
            personal_email: email.to_string(),
            annual_leave: Some(10.0),
            sick_leave: Some(2.0),
        }
    }

    #[test_context(EmployeeTestContext)]
    #[test]
    fn test_create_and_list(ctx: &mut EmployeeTestContext) {
        let cfg = LedgerConfig::default();
        let service = EmployeeService::new(&ctx.db, &cfg);

        let created = service.create(&new_employee("John@Example.com ")).unwrap();
        assert!(!created.reactivated);
        // Email is normalized on the way in.
        assert_eq!(created.employee.personal_email, "john@example.com");

        let listed = service.list().unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].full_name(), "John Doe");
    }

    #[test_context(EmployeeTestContext)]
    #[test]
    fn test_create_bootstraps_current_year_balances(ctx: &mut EmployeeTestContext) {
        let cfg = LedgerConfig::default();
        let created = EmployeeService::new(&ctx.db, &cfg).create(&new_employee("john@example.com")).unwrap();

        let conn = ctx.db.lock();
        let balances = Balances::new(&conn);
        let privilege = balances
            .fetch(&created.employee.id, BalanceKind::Privilege, current_year())
            .unwrap()
            .unwrap();
        let sick = balances.fetch(&created.employee.id, BalanceKind::Sick, current_year()).unwrap().unwrap();
        assert_eq!(privilege.allocated_days, 10.0);
        assert_eq!(sick.allocated_days, 2.0);
    }

    #[test_context(EmployeeTestContext)]
    #[test]
    fn test_duplicate_active_email_is_rejected(ctx: &mut EmployeeTestContext) {
        let cfg = LedgerConfig::default();
        let service = EmployeeService::new(&ctx.db, &cfg);

        service.create(&new_employee("john@example.com")).unwrap();
        let err = service.create(&new_employee("john@example.com")).unwrap_err();
        assert!(matches!(err, LedgerError::Validation(_)));
        assert!(err.to_string().contains("already exists"));
    }

    #[test_context(EmployeeTestContext)]
    #[test]
    fn test_invalid_fields_are_rejected(ctx: &mut EmployeeTestContext) {
        let cfg = LedgerConfig::default();
        let service = EmployeeService::new(&ctx.db, &cfg);

        let mut bad_email = new_employee("not-an-email");
        bad_email.personal_email = "not-an-email".to_string();
        assert!(service.create(&bad_email).is_err());

        let mut long_name = new_employee("long@example.com");
        long_name.first_name = "x".repeat(51);
        assert!(service.create(&long_name).is_err());

        let mut empty_surname = new_employee("empty@example.com");
        empty_surname.surname = "  ".to_string();
        assert!(service.create(&empty_surname).is_err());
    }

    #[test_context(EmployeeTestContext)]
    #[test]
    fn test_employee_reactivation(ctx: &mut EmployeeTestContext) {
        let cfg = LedgerConfig::default();
        let service = EmployeeService::new(&ctx.db, &cfg);

        let created = service.create(&new_employee("john@example.com")).unwrap();
        service.deactivate(&created.employee.id).unwrap();

        // Re-hiring with the same email revives the original row with the
        // updated details.
        let reactivated = service
            .create(&NewEmployee {
                first_name: "Johnny".to_string(),
                surname: "Doe".to_string(),
                personal_email: "john@example.com".to_string(),
                annual_leave: Some(12.0),
                sick_leave: Some(4.0),
            })
            .unwrap();

        assert!(reactivated.reactivated);
        assert_eq!(reactivated.employee.id, created.employee.id);
        assert_eq!(reactivated.employee.first_name, "Johnny");
        assert_eq!(reactivated.employee.annual_leave, Some(12.0));
        assert!(reactivated.employee.is_active);

        // Still a single row for that email.
        let conn = ctx.db.lock();
        let count: i64 = conn
            .query_row("SELECT COUNT(*) FROM employees WHERE personal_email = ?1", ["john@example.com"], |row| {
                row.get(0)
            })
            .unwrap();
        assert_eq!(count, 1);
    }

    #[test_context(EmployeeTestContext)]
    #[test]
    fn test_deactivate_unknown_or_inactive_fails(ctx: &mut EmployeeTestContext) {
        let cfg = LedgerConfig::default();
        let service = EmployeeService::new(&ctx.db, &cfg);

        assert!(matches!(service.deactivate("ghost"), Err(LedgerError::EmployeeNotFound(_))));

        let created = service.create(&new_employee("john@example.com")).unwrap();
        service.deactivate(&created.employee.id).unwrap();
        assert!(matches!(
            service.deactivate(&created.employee.id),
            Err(LedgerError::EmployeeNotFound(_))
        ));
    }

    #[test_context(EmployeeTestContext)]
    #[test]
    fn test_update_requires_an_active_employee(ctx: &mut EmployeeTestContext) {
        let cfg = LedgerConfig::default();
        let service = EmployeeService::new(&ctx.db, &cfg);

        let err = service.update("ghost", &new_employee("ghost@example.com")).unwrap_err();
        assert!(matches!(err, LedgerError::EmployeeNotFound(_)));

        let created = service.create(&new_employee("john@example.com")).unwrap();
        let mut updated = new_employee("john@example.com");
        updated.first_name = "Jon".to_string();
        service.update(&created.employee.id, &updated).unwrap();

        let stored = service.find(&created.employee.id).unwrap().unwrap();
        assert_eq!(stored.first_name, "Jon");
    }
}
