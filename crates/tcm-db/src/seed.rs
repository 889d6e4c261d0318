//! Predefined tag taxonomy.
//!
//! `tcm seed-tags` loads these categories into an empty database so new
//! installations start with a usable set of labels.

use crate::TcmDb;
use crate::error::DatabaseError;
use crate::helpers::now;
use crate::repos::tag::delete_all_tags_in;
use crate::repos::{TAG_FOLDED, refresh_folded};
use crate::service::TcmService;

/// Category name and its example values.
pub const PREDEFINED_TAGS: &[(&str, &[&str])] = &[
    // Organizational
    (
        "organization",
        &[
            "Finance",
            "Operations",
            "Information Technology",
            "Sales & Marketing",
            "Human Resources",
            "Legal & Compliance",
        ],
    ),
    (
        "business_unit",
        &[
            "North America",
            "EMEA",
            "APAC",
            "LATAM",
            "Retail Division",
            "Commercial Division",
        ],
    ),
    (
        "customer",
        &["Enterprise Clients", "SMB", "Individual Consumers", "Government Agencies"],
    ),
    ("vendor", &["Stripe", "PayPal", "AWS", "Salesforce", "Twilio"]),
    (
        "program",
        &[
            "Digital Transformation",
            "Cloud Migration",
            "SOX Compliance",
            "GDPR Compliance",
            "System Modernization",
        ],
    ),
    (
        "squad",
        &["Platform Team", "Frontend Team", "Backend Team", "QA Team", "DevOps Team"],
    ),
    (
        "owner",
        &["QA Lead", "Test Manager", "Product Owner", "Engineering Manager"],
    ),
    // System and technical
    (
        "system",
        &["ERP", "CRM", "HRIS", "Payment Gateway", "Order Management", "Customer Portal"],
    ),
    (
        "process",
        &["Order-to-Cash", "Procure-to-Pay", "Hire-to-Retire", "Lead-to-Opportunity"],
    ),
    (
        "module",
        &[
            "Authentication",
            "User Management",
            "Reporting",
            "Billing",
            "Inventory",
            "API Integration",
        ],
    ),
    ("server", &["Production", "Staging", "UAT", "QA", "Development"]),
    ("cloud_provider", &["AWS", "Azure", "GCP", "On-Premise", "Hybrid"]),
    ("database", &["PostgreSQL", "MySQL", "MongoDB", "Redis", "Oracle"]),
    ("protocol", &["HTTP", "HTTPS", "WebSocket", "gRPC", "REST", "SOAP"]),
    // Testing
    (
        "test_type",
        &[
            "Functional",
            "Integration",
            "Performance",
            "Security",
            "Regression",
            "Smoke",
            "Sanity",
        ],
    ),
    (
        "test_level",
        &["Unit", "Component", "Integration", "System", "Acceptance"],
    ),
    (
        "automation_status",
        &["Automated", "Manual", "Candidate for Automation", "Not Automatable"],
    ),
    ("priority", &["Critical", "High", "Medium", "Low"]),
    ("risk_level", &["High Risk", "Medium Risk", "Low Risk"]),
    (
        "test_phase",
        &["Development", "System Testing", "UAT", "Regression", "Release Validation"],
    ),
    ("test_status", &["Active", "Deprecated", "Draft", "Under Review"]),
    ("maintenance_status", &["Maintained", "Legacy", "Sunset"]),
    // Platform
    ("platform", &["Web", "Mobile", "Desktop", "API", "CLI"]),
    ("browser", &["Chrome", "Firefox", "Safari", "Edge"]),
    ("os", &["Windows", "Linux", "MacOS", "iOS", "Android"]),
    ("device_type", &["Desktop", "Tablet", "Mobile", "Wearable"]),
    // Project management
    ("release", &["v1.0", "v1.1", "v2.0", "Q1 2025", "Q2 2025"]),
    ("sprint", &["Sprint 1", "Sprint 2", "Sprint 3"]),
    (
        "epic",
        &["User Authentication", "Payment Processing", "Reporting Dashboard"],
    ),
    (
        "feature",
        &[
            "User Login",
            "Password Reset",
            "Two-Factor Authentication",
            "Payment Gateway Integration",
        ],
    ),
    // Compliance and security
    (
        "data_classification",
        &["Public", "Internal", "Confidential", "Restricted"],
    ),
    ("compliance_requirement", &["HIPAA", "PCI-DSS", "SOX", "GDPR", "SOC2"]),
    (
        "security_level",
        &["Public Access", "Authenticated", "Role-Based", "Admin Only"],
    ),
    // Localization
    ("region", &["North America", "Europe", "Asia", "South America"]),
    ("language", &["English", "Spanish", "French", "German", "Chinese"]),
    ("locale", &["en-US", "en-GB", "es-ES", "fr-FR", "de-DE"]),
    ("timezone", &["UTC", "EST", "PST", "CET", "JST"]),
    // Integrations
    (
        "integration_point",
        &["Payment Gateway", "Email Service", "SMS Service", "Analytics Platform"],
    ),
    ("api_version", &["v1", "v2", "v3"]),
    ("dependency", &["External API", "Database", "Third-party Service"]),
];

/// Outcome of [`TcmService::seed_predefined_tags`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeedReport {
    /// Tags deleted before seeding (only with `clear`).
    pub cleared: u64,
    pub created: u64,
    /// True when tags already existed and nothing was inserted.
    pub skipped: bool,
}

async fn seed_in(conn: &libsql::Connection, clear: bool) -> Result<SeedReport, DatabaseError> {
    let mut report = SeedReport::default();
    if clear {
        report.cleared = delete_all_tags_in(conn).await?;
    }

    let mut rows = conn.query("SELECT 1 FROM tags LIMIT 1", ()).await?;
    if rows.next().await?.is_some() {
        report.skipped = true;
        return Ok(report);
    }

    let (_, ts) = now();
    for (category, values) in PREDEFINED_TAGS {
        for value in *values {
            conn.execute(
                "INSERT INTO tags (category, value, description, is_predefined, created_at, updated_at)
                 VALUES (?1, ?2, ?3, 1, ?4, ?4)",
                libsql::params![*category, *value, format!("{value} ({category})"), ts.as_str()],
            )
            .await?;
            report.created += 1;
        }
    }
    refresh_folded(conn, TAG_FOLDED, None).await?;
    Ok(report)
}

impl TcmService {
    /// Insert the predefined taxonomy.
    ///
    /// Does nothing if any tag exists, unless `clear` is set, in which case
    /// every tag (and its test case links) is deleted first. Runs in one
    /// transaction.
    pub async fn seed_predefined_tags(&self, clear: bool) -> Result<SeedReport, DatabaseError> {
        let (_guard, tx) = self.db().begin().await?;
        let result = seed_in(&tx, clear).await;
        let report = TcmDb::finish(tx, result).await?;
        if report.skipped {
            tracing::info!("tags already exist, skipping seeding");
        } else {
            tracing::info!(
                created = report.created,
                cleared = report.cleared,
                categories = PREDEFINED_TAGS.len(),
                "seeded predefined tags"
            );
        }
        Ok(report)
    }
}
