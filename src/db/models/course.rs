use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use sqlx::types::Uuid;
use time::OffsetDateTime;
use validator::Validate;

#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type, Serialize, Deserialize)]
#[sqlx(type_name = "course_level", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum CourseLevel {
    Beginner,
    Intermediate,
    Advanced,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type, Serialize, Deserialize)]
#[sqlx(type_name = "class_type", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum ClassType {
    Online,
    Offline,
    Both,
}

#[derive(Debug, Clone, sqlx::FromRow, Serialize, Deserialize)]
pub struct Course {
    pub id: Uuid,
    pub institute_id: Uuid,
    pub category_id: Uuid,
    pub title: String,
    pub description: String,
    pub image_key: Option<String>,
    pub duration: String,
    pub level: CourseLevel,
    pub class_type: ClassType,
    pub seats: i32,
    pub original_price: Decimal,
    pub discount_percent: i32,
    pub discount_price: Decimal,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

#[derive(Debug, Deserialize, Validate)]
pub struct NewCourse {
    pub category_id: Uuid,
    #[validate(length(min = 1, message = "Title must not be empty"))]
    pub title: String,
    #[validate(length(min = 1))]
    pub description: String,
    pub image_key: Option<String>,
    pub duration: String,
    pub level: CourseLevel,
    pub class_type: ClassType,
    #[validate(range(min = 0))]
    pub seats: i32,
    pub original_price: Decimal,
    #[validate(range(min = 0, max = 100))]
    pub discount_percent: i32,
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateCourse {
    #[validate(length(min = 1))]
    pub title: Option<String>,
    pub description: Option<String>,
    pub image_key: Option<String>,
    pub duration: Option<String>,
    pub level: Option<CourseLevel>,
    pub class_type: Option<ClassType>,
    #[validate(range(min = 0))]
    pub seats: Option<i32>,
    pub original_price: Option<Decimal>,
    #[validate(range(min = 0, max = 100))]
    pub discount_percent: Option<i32>,
}

/// Effective price after discount, rounded to currency precision.
/// Recomputed on every course save; equal to the original price when no
/// discount is set.
pub fn discounted_price(original_price: Decimal, discount_percent: i32) -> Decimal {
    if discount_percent <= 0 {
        return original_price;
    }
    let discount = original_price * Decimal::from(discount_percent) / Decimal::from(100);
    (original_price - discount).round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

#[cfg(test)]
mod tests {
    use super::discounted_price;
    use rust_decimal_macros::dec;

    #[test]
    fn no_discount_keeps_original_price() {
        assert_eq!(discounted_price(dec!(1000.00), 0), dec!(1000.00));
    }

    #[test]
    fn discount_is_subtracted_from_original() {
        assert_eq!(discounted_price(dec!(1000.00), 10), dec!(900.00));
        assert_eq!(discounted_price(dec!(2000.00), 25), dec!(1500.00));
        assert_eq!(discounted_price(dec!(500.00), 100), dec!(0.00));
    }

    #[test]
    fn result_is_rounded_to_two_decimal_places() {
        // 33% off 99.99 is 66.9933
        assert_eq!(discounted_price(dec!(99.99), 33), dec!(66.99));
        assert_eq!(discounted_price(dec!(10.00), 33), dec!(6.70));
    }
}
