//! Demo employees for development and tests.

use pharmacrm_core::{EmployeeId, Role};

use crate::directory::{DirectoryError, EmployeeDirectory};
use crate::record::EmployeeRecord;

pub struct DemoAccount {
    pub id: &'static str,
    pub username: &'static str,
    pub password: &'static str,
    pub name: &'static str,
    pub email: &'static str,
    pub role: Role,
}

pub const DEMO_ACCOUNTS: [DemoAccount; 3] = [
    DemoAccount {
        id: "admin-001",
        username: "admin",
        password: "admin123",
        name: "Admin User",
        email: "admin@pharmasync.com",
        role: Role::Admin,
    },
    DemoAccount {
        id: "sales-001",
        username: "sales",
        password: "sales123",
        name: "Sales Rep",
        email: "sales@pharmasync.com",
        role: Role::SalesRep,
    },
    DemoAccount {
        id: "manager-001",
        username: "manager",
        password: "manager123",
        name: "Manager User",
        email: "manager@pharmasync.com",
        role: Role::Manager,
    },
];

/// Add the demo accounts to `directory`.
pub fn seed_demo(directory: &EmployeeDirectory) -> Result<(), DirectoryError> {
    for account in &DEMO_ACCOUNTS {
        let record = EmployeeRecord::new(
            EmployeeId::new(account.id)?,
            account.username,
            account.name,
            account.role,
            account.password,
        )?
        .with_email(account.email);
        directory.insert(record)?;
    }
    tracing::info!(count = DEMO_ACCOUNTS.len(), "seeded demo employees");
    Ok(())
}

pub fn demo_directory() -> Result<EmployeeDirectory, DirectoryError> {
    let directory = EmployeeDirectory::new();
    seed_demo(&directory)?;
    Ok(directory)
}
