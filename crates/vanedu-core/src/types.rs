//! Domain records served by the admin API

use chrono::{DateTime, Datelike, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::query::{PaginationMeta, Searchable};

/// A record that lives in a collection keyed by a string id
pub trait Identifiable {
    /// Human-readable record kind, used in messages ("User", "Payment")
    const KIND: &'static str;

    /// The record id
    fn id(&self) -> &str;

    /// Overwrite the record id
    fn set_id(&mut self, id: String);
}

/// Generates `as_str`, `Display` and `FromStr` for a string-valued enum
macro_rules! string_enum {
    ($name:ident { $($variant:ident => $text:literal),+ $(,)? }) => {
        impl $name {
            /// Wire representation of this value
            #[must_use]
            pub const fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $text,)+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = crate::Error;

            fn from_str(s: &str) -> crate::Result<Self> {
                match s {
                    $($text => Ok(Self::$variant),)+
                    other => Err(crate::Error::validation(
                        stringify!($name),
                        format!("unknown value '{other}'"),
                    )),
                }
            }
        }
    };
}

/// Account role
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Platform administrator
    Admin,
    /// Course author
    Instructor,
    /// Learner
    Student,
}

string_enum!(Role {
    Admin => "admin",
    Instructor => "instructor",
    Student => "student",
});

/// Account status
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum UserStatus {
    /// Account can sign in
    #[default]
    Active,
    /// Account disabled
    Inactive,
}

string_enum!(UserStatus {
    Active => "active",
    Inactive => "inactive",
});

/// How a payment was made
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    /// Manual bank transfer, reviewed by an admin
    BankTransfer,
    /// Card payment
    CreditCard,
    /// `PayPal`
    Paypal,
}

string_enum!(PaymentMethod {
    BankTransfer => "bank_transfer",
    CreditCard => "credit_card",
    Paypal => "paypal",
});

/// Payment review state.
///
/// `Pending` moves to `Completed` or `Rejected`; both are terminal.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    /// Awaiting review
    #[default]
    Pending,
    /// Accepted
    Completed,
    /// Declined
    Rejected,
}

string_enum!(PaymentStatus {
    Pending => "pending",
    Completed => "completed",
    Rejected => "rejected",
});

impl PaymentStatus {
    /// Whether no further transition is defined from this state
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Rejected)
    }

    /// Whether `self -> next` is a defined transition
    #[must_use]
    pub const fn can_transition_to(self, next: Self) -> bool {
        matches!(
            (self, next),
            (Self::Pending, Self::Completed | Self::Rejected)
        )
    }
}

/// Platform account
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Unique id
    pub id: String,
    /// Display name
    pub name: String,
    /// Email address
    pub email: String,
    /// Account role
    pub role: Role,
    /// Account status
    pub status: UserStatus,
    /// Creation time
    pub created_at: DateTime<Utc>,
    /// Avatar URL
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
}

/// Course category
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    /// Unique id
    pub id: String,
    /// Category name
    pub name: String,
    /// Category description
    pub description: String,
    /// Stored course counter; not recomputed from courses
    pub course_count: u32,
    /// Creation time
    pub created_at: DateTime<Utc>,
}

/// Subscription plan offered to learners
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SubscriptionPlan {
    /// Unique id
    pub id: String,
    /// Plan name
    pub name: String,
    /// Price per billing period
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    /// Billing period in months
    pub duration: u32,
    /// Feature bullet points, in display order
    #[serde(default)]
    pub features: Vec<String>,
    /// Plan description
    pub description: String,
    /// Creation time
    pub created_at: DateTime<Utc>,
}

/// Payment submitted for a plan.
///
/// User and plan fields are a snapshot taken when the payment was recorded
/// and are not updated when the source records change.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Payment {
    /// Unique id
    pub id: String,
    /// Paying user id
    pub user_id: String,
    /// Paying user name (snapshot)
    pub user_name: String,
    /// Paying user email (snapshot)
    pub user_email: String,
    /// Purchased plan id
    pub plan_id: String,
    /// Purchased plan name (snapshot)
    pub plan_name: String,
    /// Amount paid
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,
    /// When the payment was made
    pub payment_date: DateTime<Utc>,
    /// Payment channel
    pub payment_method: PaymentMethod,
    /// Review state
    pub status: PaymentStatus,
    /// External transaction reference
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transaction_id: Option<String>,
    /// Reviewer notes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

macro_rules! identifiable {
    ($ty:ty, $kind:literal) => {
        impl Identifiable for $ty {
            const KIND: &'static str = $kind;

            fn id(&self) -> &str {
                &self.id
            }

            fn set_id(&mut self, id: String) {
                self.id = id;
            }
        }
    };
}

identifiable!(User, "User");
identifiable!(Category, "Category");
identifiable!(SubscriptionPlan, "Subscription plan");
identifiable!(Payment, "Payment");

impl Searchable for User {
    fn search_fields(&self) -> Vec<&str> {
        vec![self.name.as_str(), self.email.as_str()]
    }

    fn filter_value(&self, field: &str) -> Option<&str> {
        match field {
            "role" => Some(self.role.as_str()),
            "status" => Some(self.status.as_str()),
            _ => None,
        }
    }
}

impl Searchable for Category {
    fn search_fields(&self) -> Vec<&str> {
        vec![self.name.as_str(), self.description.as_str()]
    }
}

impl Searchable for SubscriptionPlan {
    fn search_fields(&self) -> Vec<&str> {
        vec![self.name.as_str(), self.description.as_str()]
    }
}

impl Searchable for Payment {
    fn search_fields(&self) -> Vec<&str> {
        let mut fields = vec![self.user_name.as_str(), self.user_email.as_str()];
        if let Some(transaction_id) = &self.transaction_id {
            fields.push(transaction_id.as_str());
        }
        fields
    }

    fn filter_value(&self, field: &str) -> Option<&str> {
        match field {
            "status" => Some(self.status.as_str()),
            "paymentMethod" => Some(self.payment_method.as_str()),
            _ => None,
        }
    }
}

/// Signed-in administrator profile
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct AuthUser {
    /// Account id
    pub id: String,
    /// Display name
    pub name: String,
    /// Login email
    pub email: String,
    /// Always `admin`
    pub role: Role,
    /// Avatar URL
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
}

/// New users in one calendar month
///
/// `month` alone repeats across years; `year` tells the entries apart.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MonthlyGrowth {
    /// Abbreviated month name ("Jan")
    pub month: String,
    /// Calendar year of the month
    pub year: i32,
    /// Users created that month
    pub users: u64,
}

/// Dashboard overview numbers
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    /// Number of user accounts
    pub total_users: u64,
    /// Sum of category course counters
    pub total_courses: u64,
    /// Sum of completed payment amounts
    #[serde(with = "rust_decimal::serde::float")]
    pub total_revenue: Decimal,
    /// Payments awaiting review
    pub pending_payments: u64,
    /// User sign-ups per month, oldest first
    pub monthly_user_growth: Vec<MonthlyGrowth>,
}

impl DashboardStats {
    /// Compute the overview from full collections
    #[must_use]
    pub fn compute(users: &[User], categories: &[Category], payments: &[Payment]) -> Self {
        let total_courses = categories
            .iter()
            .map(|category| u64::from(category.course_count))
            .sum();

        let total_revenue = payments
            .iter()
            .filter(|payment| payment.status == PaymentStatus::Completed)
            .map(|payment| payment.amount)
            .sum();

        let pending_payments = payments
            .iter()
            .filter(|payment| payment.status == PaymentStatus::Pending)
            .count() as u64;

        let mut by_month: BTreeMap<(i32, u32), u64> = BTreeMap::new();
        for user in users {
            let key = (user.created_at.year(), user.created_at.month());
            *by_month.entry(key).or_default() += 1;
        }

        let monthly_user_growth = by_month
            .into_iter()
            .filter_map(|((year, month), count)| {
                chrono::NaiveDate::from_ymd_opt(year, month, 1).map(|date| MonthlyGrowth {
                    month: date.format("%b").to_string(),
                    year,
                    users: count,
                })
            })
            .collect();

        Self {
            total_users: users.len() as u64,
            total_courses,
            total_revenue,
            pending_payments,
            monthly_user_growth,
        }
    }
}

/// Response envelope: `{data, meta?, message?}`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    /// Response data
    pub data: T,

    /// Pagination metadata for list responses
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<PaginationMeta>,

    /// Human-readable outcome
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl<T> ApiResponse<T> {
    /// Plain data response
    pub const fn data(data: T) -> Self {
        Self {
            data,
            meta: None,
            message: None,
        }
    }

    /// Data with an outcome message
    pub fn with_message(data: T, message: impl Into<String>) -> Self {
        Self {
            data,
            meta: None,
            message: Some(message.into()),
        }
    }

    /// One page of a list
    pub const fn paginated(data: T, meta: PaginationMeta) -> Self {
        Self {
            data,
            meta: Some(meta),
            message: None,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use serde_json::json;

    fn user(id: &str, created: DateTime<Utc>) -> User {
        User {
            id: id.to_string(),
            name: format!("User {id}"),
            email: format!("user{id}@example.com"),
            role: Role::Student,
            status: UserStatus::Active,
            created_at: created,
            avatar: None,
        }
    }

    fn payment(id: &str, amount: Decimal, status: PaymentStatus) -> Payment {
        Payment {
            id: id.to_string(),
            user_id: "1".to_string(),
            user_name: "John Doe".to_string(),
            user_email: "john@example.com".to_string(),
            plan_id: "1".to_string(),
            plan_name: "Premium Monthly".to_string(),
            amount,
            payment_date: Utc.with_ymd_and_hms(2024, 2, 15, 10, 30, 0).unwrap(),
            payment_method: PaymentMethod::BankTransfer,
            status,
            transaction_id: Some(format!("TXN-{id}")),
            notes: None,
        }
    }

    #[rstest]
    #[case("admin", Role::Admin)]
    #[case("instructor", Role::Instructor)]
    #[case("student", Role::Student)]
    fn test_role_round_trips_through_str(#[case] text: &str, #[case] role: Role) {
        assert_eq!(text.parse::<Role>().unwrap(), role);
        assert_eq!(role.to_string(), text);
    }

    #[test]
    fn test_unknown_enum_value_is_validation_error() {
        let err = "janitor".parse::<Role>().unwrap_err();
        assert!(matches!(err, crate::Error::Validation { .. }));
    }

    #[test]
    fn test_payment_status_transitions() {
        use PaymentStatus::{Completed, Pending, Rejected};

        assert!(Pending.can_transition_to(Completed));
        assert!(Pending.can_transition_to(Rejected));
        assert!(!Completed.can_transition_to(Rejected));
        assert!(!Rejected.can_transition_to(Pending));
        assert!(!Pending.can_transition_to(Pending));

        assert!(!Pending.is_terminal());
        assert!(Completed.is_terminal());
        assert!(Rejected.is_terminal());
    }

    #[test]
    fn test_user_serializes_camel_case() {
        let created = Utc.with_ymd_and_hms(2024, 1, 15, 8, 30, 0).unwrap();
        let value = serde_json::to_value(user("1", created)).unwrap();

        assert_eq!(value["createdAt"], json!("2024-01-15T08:30:00Z"));
        assert_eq!(value["role"], json!("student"));
        assert!(value.get("avatar").is_none());
    }

    #[test]
    fn test_payment_wire_format() {
        let value =
            serde_json::to_value(payment("1", Decimal::new(2999, 2), PaymentStatus::Pending))
                .unwrap();

        assert_eq!(value["amount"], json!(29.99));
        assert_eq!(value["paymentMethod"], json!("bank_transfer"));
        assert_eq!(value["status"], json!("pending"));
        assert_eq!(value["userName"], json!("John Doe"));
        assert!(value.get("notes").is_none());
    }

    #[test]
    fn test_plan_features_default_to_empty() {
        let plan: SubscriptionPlan = serde_json::from_value(json!({
            "id": "9",
            "name": "Trial",
            "price": 0,
            "duration": 1,
            "description": "Try it",
            "createdAt": "2024-01-01T00:00:00Z"
        }))
        .unwrap();

        assert!(plan.features.is_empty());
        assert_eq!(plan.price, Decimal::ZERO);
    }

    #[test]
    fn test_payment_search_fields_include_transaction_id() {
        let payment = payment("3", Decimal::new(10, 0), PaymentStatus::Completed);
        assert_eq!(
            payment.search_fields(),
            vec!["John Doe", "john@example.com", "TXN-3"]
        );
        assert_eq!(payment.filter_value("paymentMethod"), Some("bank_transfer"));
        assert_eq!(payment.filter_value("unknown"), None);
    }

    #[test]
    fn test_dashboard_stats_compute() {
        let users = vec![
            user("1", Utc.with_ymd_and_hms(2024, 2, 1, 0, 0, 0).unwrap()),
            user("2", Utc.with_ymd_and_hms(2024, 1, 20, 0, 0, 0).unwrap()),
            user("3", Utc.with_ymd_and_hms(2024, 2, 10, 0, 0, 0).unwrap()),
        ];
        let categories = vec![Category {
            id: "1".to_string(),
            name: "Design".to_string(),
            description: "UI".to_string(),
            course_count: 6,
            created_at: Utc::now(),
        }];
        let payments = vec![
            payment("1", Decimal::new(2999, 2), PaymentStatus::Pending),
            payment("2", Decimal::new(29999, 2), PaymentStatus::Completed),
            payment("3", Decimal::new(999, 2), PaymentStatus::Rejected),
        ];

        let stats = DashboardStats::compute(&users, &categories, &payments);

        assert_eq!(stats.total_users, 3);
        assert_eq!(stats.total_courses, 6);
        assert_eq!(stats.total_revenue, Decimal::new(29999, 2));
        assert_eq!(stats.pending_payments, 1);
        assert_eq!(
            stats.monthly_user_growth,
            vec![
                MonthlyGrowth {
                    month: "Jan".to_string(),
                    year: 2024,
                    users: 1
                },
                MonthlyGrowth {
                    month: "Feb".to_string(),
                    year: 2024,
                    users: 2
                },
            ]
        );
    }

    #[test]
    fn test_growth_keeps_same_month_of_different_years_apart() {
        let users = vec![
            user("1", Utc.with_ymd_and_hms(2024, 1, 5, 0, 0, 0).unwrap()),
            user("2", Utc.with_ymd_and_hms(2023, 12, 31, 23, 0, 0).unwrap()),
            user("3", Utc.with_ymd_and_hms(2023, 1, 9, 0, 0, 0).unwrap()),
            user("4", Utc.with_ymd_and_hms(2024, 1, 28, 0, 0, 0).unwrap()),
        ];

        let growth = DashboardStats::compute(&users, &[], &[]).monthly_user_growth;
        let entries: Vec<(&str, i32, u64)> = growth
            .iter()
            .map(|entry| (entry.month.as_str(), entry.year, entry.users))
            .collect();

        assert_eq!(
            entries,
            vec![("Jan", 2023, 1), ("Dec", 2023, 1), ("Jan", 2024, 2)]
        );
        assert_eq!(
            serde_json::to_value(&growth[0]).unwrap(),
            json!({"month": "Jan", "year": 2023, "users": 1})
        );
    }

    #[test]
    fn test_api_response_omits_empty_fields() {
        let value = serde_json::to_value(ApiResponse::data(vec![1, 2])).unwrap();
        assert_eq!(value, json!({ "data": [1, 2] }));

        let value = serde_json::to_value(ApiResponse::with_message("x", "done")).unwrap();
        assert_eq!(value, json!({ "data": "x", "message": "done" }));
    }
}
