//! Fixture records shared by unit tests

use chrono::{DateTime, TimeZone, Utc};
use uuid::Uuid;

use crate::record::FieldValue;
use crate::value::{FieldType, Value};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Active,
    Suspended,
    Closed,
}

impl FieldValue for Status {
    const TYPE: FieldType = FieldType::Enum(&["Active", "Suspended", "Closed"]);

    fn to_value(&self) -> Value<'_> {
        Value::Enum(*self as u32)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Person {
    pub id: Uuid,
    pub name: String,
    pub last_name: String,
    pub age: i32,
    pub active: bool,
    pub status: Status,
    pub nickname: Option<String>,
    pub created_date_utc: DateTime<Utc>,
}

crate::record!(Person {
    "Id" => id: Uuid,
    "Name" => name: String,
    "LastName" => last_name: String,
    "Age" => age: i32,
    "Active" => active: bool,
    "Status" => status: Status,
    "Nickname" => nickname: Option<String>,
    "CreatedDateUtc" => created_date_utc: DateTime<Utc>,
});

fn person(n: u32, name: &str, last_name: &str, age: i32, status: Status) -> Person {
    Person {
        id: Uuid::from_u128(n as u128),
        name: name.to_string(),
        last_name: last_name.to_string(),
        age,
        active: status == Status::Active,
        status,
        nickname: None,
        created_date_utc: Utc.with_ymd_and_hms(2024, 1, n, 9, 0, 0).unwrap(),
    }
}

/// Ten people; ages 25, 30, 18, 55, 35, 50, 80, 43, 65, 28
pub fn people() -> Vec<Person> {
    let mut people = vec![
        person(1, "John", "Doe", 25, Status::Active),
        person(2, "Michael", "Johnson", 30, Status::Active),
        person(3, "John", "Wilson", 18, Status::Suspended),
        person(4, "John", "Thomas", 55, Status::Active),
        person(5, "Emily", "Davis", 35, Status::Closed),
        person(6, "David", "Brown", 50, Status::Active),
        person(7, "John", "Moore", 80, Status::Closed),
        person(8, "Anna", "Taylor", 43, Status::Suspended),
        person(9, "James", "Anderson", 65, Status::Active),
        person(10, "Jane", "Smith", 28, Status::Active),
    ];
    people[0].nickname = Some("Johnny".to_string());
    people[4].nickname = Some("Em".to_string());
    people
}

pub fn ages(people: &[Person]) -> Vec<i32> {
    people.iter().map(|p| p.age).collect()
}
