//! Sample records loaded into a fresh data source

use chrono::{DateTime, TimeZone, Utc};
use rust_decimal::Decimal;
use vanedu_core::{
    Category, Payment, PaymentMethod, PaymentStatus, Role, SubscriptionPlan, User, UserStatus,
};

fn timestamp(year: i32, month: u32, day: u32, hour: u32, minute: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, day, hour, minute, 0)
        .single()
        .unwrap_or_default()
}

fn user(
    id: &str,
    name: &str,
    role: Role,
    status: UserStatus,
    created_at: DateTime<Utc>,
) -> User {
    let first = name.split_whitespace().next().unwrap_or(name).to_lowercase();
    User {
        id: id.to_string(),
        name: name.to_string(),
        email: format!("{first}@example.com"),
        role,
        status,
        created_at,
        avatar: Some(format!("/avatars/{id:0>2}.png")),
    }
}

/// Five accounts: three students and two instructors, one inactive
#[must_use]
pub fn users() -> Vec<User> {
    vec![
        user("1", "John Doe", Role::Student, UserStatus::Active, timestamp(2024, 1, 15, 8, 30)),
        user("2", "Jane Smith", Role::Instructor, UserStatus::Active, timestamp(2024, 1, 20, 10, 15)),
        user("3", "Mike Johnson", Role::Student, UserStatus::Inactive, timestamp(2024, 2, 1, 14, 45)),
        user("4", "Sarah Wilson", Role::Instructor, UserStatus::Active, timestamp(2024, 2, 5, 9, 20)),
        user("5", "David Brown", Role::Student, UserStatus::Active, timestamp(2024, 2, 10, 16, 30)),
    ]
}

/// Four course categories with 41 courses between them
#[must_use]
pub fn categories() -> Vec<Category> {
    let category = |id: &str, name: &str, description: &str, course_count, created_at| Category {
        id: id.to_string(),
        name: name.to_string(),
        description: description.to_string(),
        course_count,
        created_at,
    };

    vec![
        category(
            "1",
            "Web Development",
            "Learn modern web development technologies",
            15,
            timestamp(2024, 1, 10, 8, 0),
        ),
        category(
            "2",
            "Data Science",
            "Master data analysis and machine learning",
            8,
            timestamp(2024, 1, 15, 10, 30),
        ),
        category(
            "3",
            "Mobile Development",
            "Build native and cross-platform mobile apps",
            12,
            timestamp(2024, 1, 20, 14, 15),
        ),
        category(
            "4",
            "Design",
            "UI/UX design and graphic design fundamentals",
            6,
            timestamp(2024, 1, 25, 9, 45),
        ),
    ]
}

/// Monthly, annual and basic plans
#[must_use]
pub fn subscription_plans() -> Vec<SubscriptionPlan> {
    let created_at = timestamp(2024, 1, 1, 0, 0);
    let features = |items: &[&str]| items.iter().map(ToString::to_string).collect();

    vec![
        SubscriptionPlan {
            id: "1".to_string(),
            name: "Premium Monthly".to_string(),
            price: Decimal::new(2999, 2),
            duration: 1,
            features: features(&[
                "Access to all courses",
                "Download materials",
                "Community access",
                "Email support",
            ]),
            description: "Perfect for getting started with premium features".to_string(),
            created_at,
        },
        SubscriptionPlan {
            id: "2".to_string(),
            name: "Premium Annual".to_string(),
            price: Decimal::new(29999, 2),
            duration: 12,
            features: features(&[
                "All Premium Monthly features",
                "Priority support",
                "Exclusive webinars",
                "2 months free",
            ]),
            description: "Best value for committed learners".to_string(),
            created_at,
        },
        SubscriptionPlan {
            id: "3".to_string(),
            name: "Basic".to_string(),
            price: Decimal::new(999, 2),
            duration: 1,
            features: features(&["Access to basic courses", "Community access"]),
            description: "Great for exploring our platform".to_string(),
            created_at,
        },
    ]
}

/// Three bank transfers: two pending review, one completed
///
/// User and plan names are snapshots of [`users`] and [`subscription_plans`].
#[must_use]
pub fn payments() -> Vec<Payment> {
    let payment = |id: &str, buyer: &User, plan: &SubscriptionPlan, paid_at, status| Payment {
        id: id.to_string(),
        user_id: buyer.id.clone(),
        user_name: buyer.name.clone(),
        user_email: buyer.email.clone(),
        plan_id: plan.id.clone(),
        plan_name: plan.name.clone(),
        amount: plan.price,
        payment_date: paid_at,
        payment_method: PaymentMethod::BankTransfer,
        status,
        transaction_id: Some(format!("TXN-{id:0>3}-2024")),
        notes: None,
    };

    let users = users();
    let plans = subscription_plans();
    let (Some(john), Some(jane), Some(mike)) = (users.first(), users.get(1), users.get(2)) else {
        return Vec::new();
    };
    let (Some(monthly), Some(annual)) = (plans.first(), plans.get(1)) else {
        return Vec::new();
    };

    vec![
        Payment {
            notes: Some("Bank transfer confirmation pending".to_string()),
            ..payment("1", john, monthly, timestamp(2024, 2, 15, 10, 30), PaymentStatus::Pending)
        },
        payment("2", jane, annual, timestamp(2024, 2, 14, 14, 15), PaymentStatus::Pending),
        payment("3", mike, monthly, timestamp(2024, 2, 13, 9, 45), PaymentStatus::Completed),
    ]
}
