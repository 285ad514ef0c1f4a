use chrono::NaiveDate;
use tracing::{info, instrument};

use crate::{
    EmploymentType,
    error::HrResult,
    model::{EmployeeDetails, NewEmployee},
    repo::EmployeeRepo,
};

struct DemoEmployee {
    name: &'static str,
    email: &'static str,
    department: &'static str,
    position: &'static str,
    start: (i32, u32, u32),
    kind: EmploymentType,
}

const DEMO: [DemoEmployee; 8] = [
    DemoEmployee {
        name: "Jane Miller",
        email: "jane.miller@company.com",
        department: "Engineering",
        position: "Senior Developer",
        start: (2020, 1, 15),
        kind: EmploymentType::FullTime,
    },
    DemoEmployee {
        name: "Tom Smith",
        email: "tom.smith@company.com",
        department: "Sales",
        position: "Account Executive",
        start: (2021, 3, 22),
        kind: EmploymentType::FullTime,
    },
    DemoEmployee {
        name: "Alex Johnson",
        email: "alex.johnson@company.com",
        department: "Marketing",
        position: "Manager",
        start: (2019, 11, 5),
        kind: EmploymentType::FullTime,
    },
    DemoEmployee {
        name: "Rachel Brown",
        email: "rachel.brown@company.com",
        department: "Customer Support",
        position: "Lead",
        start: (2022, 2, 10),
        kind: EmploymentType::FullTime,
    },
    DemoEmployee {
        name: "Michael Chen",
        email: "michael.chen@company.com",
        department: "Engineering",
        position: "Developer",
        start: (2021, 7, 18),
        kind: EmploymentType::FullTime,
    },
    DemoEmployee {
        name: "Sarah Wilson",
        email: "sarah.wilson@company.com",
        department: "HR",
        position: "Specialist",
        start: (2020, 9, 30),
        kind: EmploymentType::PartTime,
    },
    DemoEmployee {
        name: "David Lee",
        email: "david.lee@company.com",
        department: "Finance",
        position: "Analyst",
        start: (2022, 1, 5),
        kind: EmploymentType::FullTime,
    },
    DemoEmployee {
        name: "Emily Davis",
        email: "emily.davis@company.com",
        department: "Product",
        position: "Manager",
        start: (2019, 5, 12),
        kind: EmploymentType::FullTime,
    },
];

impl DemoEmployee {
    fn to_new_employee(&self) -> NewEmployee {
        let (y, m, d) = self.start;
        NewEmployee::new(self.name, self.email, self.department, self.position).with_details(
            EmployeeDetails {
                employment_type: Some(Some(self.kind)),
                start_date: Some(NaiveDate::from_ymd_opt(y, m, d)),
                ..EmployeeDetails::default()
            },
        )
    }
}

/// Inserts the demo roster, skipping any email already present. Returns the
/// number of records created.
#[instrument(name = "hr.seed", skip_all)]
pub async fn seed_demo(repo: &EmployeeRepo) -> HrResult<usize> {
    let mut created = 0;
    for demo in &DEMO {
        if repo.find_by_email(demo.email).await?.is_some() {
            continue;
        }
        repo.create(demo.to_new_employee()).await?;
        created += 1;
    }
    info!(created, total = DEMO.len(), "demo employees seeded");
    Ok(created)
}
