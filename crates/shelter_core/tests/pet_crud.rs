use shelter_core::db::open_db_in_memory;
use shelter_core::{
    Gender, PetAddress, PetListQuery, PetOrder, PetRepository, PetService, PetValidationError,
    PetValues, RepoError, SqlitePetRepository,
};
use rusqlite::Connection;

fn values(name: &str, breed: &str, gender: i64, weight: i64) -> PetValues {
    PetValues {
        name: Some(name.to_string()),
        breed: Some(breed.to_string()),
        gender: Some(gender),
        weight: Some(weight),
    }
}

fn collection_len(repo: &SqlitePetRepository<'_>) -> usize {
    repo.query(&PetAddress::collection(), &PetListQuery::default())
        .unwrap()
        .len()
}

#[test]
fn insert_and_query_roundtrip() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqlitePetRepository::try_new(&conn).unwrap();

    let id = repo
        .insert(
            &PetAddress::collection(),
            &values("Garfield", "Tabby", Gender::Female.code(), 8),
        )
        .unwrap();
    assert!(id >= 0);

    let pets = repo
        .query(&PetAddress::item(id), &PetListQuery::default())
        .unwrap();
    assert_eq!(pets.len(), 1);

    let pet = &pets[0];
    assert_eq!(pet.id, Some(id));
    assert_eq!(pet.name, "Garfield");
    assert_eq!(pet.breed, "Tabby");
    assert_eq!(pet.gender, Gender::Female);
    assert_eq!(pet.weight, 8);
}

#[test]
fn insert_assigns_monotonically_increasing_ids_never_reused() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqlitePetRepository::try_new(&conn).unwrap();

    let first = repo
        .insert(&PetAddress::collection(), &values("A", "", 0, 1))
        .unwrap();
    let second = repo
        .insert(&PetAddress::collection(), &values("B", "", 0, 2))
        .unwrap();
    assert!(second > first);

    assert_eq!(repo.delete(&PetAddress::item(second)).unwrap(), 1);

    let third = repo
        .insert(&PetAddress::collection(), &values("C", "", 0, 3))
        .unwrap();
    assert!(third > second, "deleted id {second} must not be reused");
}

#[test]
fn insert_defaults_absent_fields() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqlitePetRepository::try_new(&conn).unwrap();

    let id = repo
        .insert(
            &PetAddress::collection(),
            &PetValues {
                name: Some("Rex".to_string()),
                ..PetValues::default()
            },
        )
        .unwrap();

    let pet = repo
        .query(&PetAddress::item(id), &PetListQuery::default())
        .unwrap()
        .remove(0);
    assert_eq!(pet.breed, "");
    assert_eq!(pet.gender, Gender::Unknown);
    assert_eq!(pet.weight, 0);
}

#[test]
fn insert_accepts_empty_name() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqlitePetRepository::try_new(&conn).unwrap();

    let id = repo
        .insert(&PetAddress::collection(), &values("", "Poodle", 1, 7))
        .unwrap();

    let pet = repo
        .query(&PetAddress::item(id), &PetListQuery::default())
        .unwrap()
        .remove(0);
    assert_eq!(pet.name, "");
}

#[test]
fn insert_rejects_unknown_gender_code_without_writing() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqlitePetRepository::try_new(&conn).unwrap();

    let err = repo
        .insert(&PetAddress::collection(), &values("Milo", "Beagle", 3, 12))
        .unwrap_err();
    assert!(matches!(
        err,
        RepoError::Validation(PetValidationError::InvalidGender(3))
    ));
    assert_eq!(collection_len(&repo), 0);
}

#[test]
fn insert_rejects_negative_weight_without_writing() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqlitePetRepository::try_new(&conn).unwrap();

    let err = repo
        .insert(&PetAddress::collection(), &values("Milo", "Beagle", 1, -5))
        .unwrap_err();
    assert!(matches!(
        err,
        RepoError::Validation(PetValidationError::NegativeWeight(-5))
    ));
    assert_eq!(collection_len(&repo), 0);
}

#[test]
fn insert_at_item_address_is_rejected() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqlitePetRepository::try_new(&conn).unwrap();

    let err = repo
        .insert(&PetAddress::item(1), &values("Milo", "Beagle", 1, 12))
        .unwrap_err();
    assert!(matches!(
        err,
        RepoError::UnsupportedAddress {
            operation: "insert",
            ..
        }
    ));
    assert_eq!(collection_len(&repo), 0);
}

#[test]
fn update_applies_only_present_fields() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqlitePetRepository::try_new(&conn).unwrap();

    let id = repo
        .insert(
            &PetAddress::collection(),
            &values("Luna", "Husky", Gender::Female.code(), 20),
        )
        .unwrap();

    let changed = repo
        .update(
            &PetAddress::item(id),
            &PetValues {
                weight: Some(23),
                ..PetValues::default()
            },
        )
        .unwrap();
    assert_eq!(changed, 1);

    let pet = repo
        .query(&PetAddress::item(id), &PetListQuery::default())
        .unwrap()
        .remove(0);
    assert_eq!(pet.name, "Luna");
    assert_eq!(pet.breed, "Husky");
    assert_eq!(pet.gender, Gender::Female);
    assert_eq!(pet.weight, 23);
}

#[test]
fn update_missing_id_returns_zero_and_changes_nothing() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqlitePetRepository::try_new(&conn).unwrap();

    repo.insert(&PetAddress::collection(), &values("Luna", "Husky", 2, 20))
        .unwrap();

    let changed = repo
        .update(&PetAddress::item(999), &values("Ghost", "None", 0, 1))
        .unwrap();
    assert_eq!(changed, 0);

    let pets = repo
        .query(&PetAddress::collection(), &PetListQuery::default())
        .unwrap();
    assert_eq!(pets.len(), 1);
    assert_eq!(pets[0].name, "Luna");
}

#[test]
fn update_with_invalid_field_is_all_or_nothing() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqlitePetRepository::try_new(&conn).unwrap();

    let id = repo
        .insert(&PetAddress::collection(), &values("Luna", "Husky", 2, 20))
        .unwrap();

    let err = repo
        .update(
            &PetAddress::item(id),
            &PetValues {
                name: Some("Nova".to_string()),
                gender: Some(7),
                ..PetValues::default()
            },
        )
        .unwrap_err();
    assert!(matches!(
        err,
        RepoError::Validation(PetValidationError::InvalidGender(7))
    ));

    let pet = repo
        .query(&PetAddress::item(id), &PetListQuery::default())
        .unwrap()
        .remove(0);
    assert_eq!(pet.name, "Luna", "no field may change when one fails validation");
}

#[test]
fn update_with_no_fields_returns_zero() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqlitePetRepository::try_new(&conn).unwrap();

    let id = repo
        .insert(&PetAddress::collection(), &values("Luna", "Husky", 2, 20))
        .unwrap();

    let changed = repo
        .update(&PetAddress::item(id), &PetValues::default())
        .unwrap();
    assert_eq!(changed, 0);
}

#[test]
fn update_collection_address_affects_all_rows() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqlitePetRepository::try_new(&conn).unwrap();

    repo.insert(&PetAddress::collection(), &values("A", "", 0, 1))
        .unwrap();
    repo.insert(&PetAddress::collection(), &values("B", "", 1, 2))
        .unwrap();

    let changed = repo
        .update(
            &PetAddress::collection(),
            &PetValues {
                weight: Some(10),
                ..PetValues::default()
            },
        )
        .unwrap();
    assert_eq!(changed, 2);

    let pets = repo
        .query(&PetAddress::collection(), &PetListQuery::default())
        .unwrap();
    assert!(pets.iter().all(|pet| pet.weight == 10));
}

#[test]
fn delete_item_then_missing_returns_zero() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqlitePetRepository::try_new(&conn).unwrap();

    let id = repo
        .insert(&PetAddress::collection(), &values("Luna", "Husky", 2, 20))
        .unwrap();

    assert_eq!(repo.delete(&PetAddress::item(id)).unwrap(), 1);
    assert_eq!(repo.delete(&PetAddress::item(id)).unwrap(), 0);
}

#[test]
fn delete_collection_clears_all_rows() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqlitePetRepository::try_new(&conn).unwrap();

    for (name, gender) in [("A", 0), ("B", 1), ("C", 2)] {
        repo.insert(&PetAddress::collection(), &values(name, "", gender, 4))
            .unwrap();
    }

    assert_eq!(repo.delete(&PetAddress::collection()).unwrap(), 3);

    let pets = repo
        .query(&PetAddress::collection(), &PetListQuery::default())
        .unwrap();
    assert!(pets.is_empty());
}

#[test]
fn query_filters_by_gender_and_orders_by_name() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqlitePetRepository::try_new(&conn).unwrap();

    repo.insert(&PetAddress::collection(), &values("Ziggy", "", 1, 3))
        .unwrap();
    repo.insert(&PetAddress::collection(), &values("Apollo", "", 1, 5))
        .unwrap();
    repo.insert(&PetAddress::collection(), &values("Bella", "", 2, 4))
        .unwrap();

    let query = PetListQuery {
        gender: Some(Gender::Male),
        order: PetOrder::Name,
        ..PetListQuery::default()
    };
    let pets = repo.query(&PetAddress::collection(), &query).unwrap();

    let names: Vec<&str> = pets.iter().map(|pet| pet.name.as_str()).collect();
    assert_eq!(names, ["Apollo", "Ziggy"]);
}

#[test]
fn query_pagination_with_limit_and_offset_is_stable() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqlitePetRepository::try_new(&conn).unwrap();

    for name in ["A", "B", "C", "D"] {
        repo.insert(&PetAddress::collection(), &values(name, "", 0, 1))
            .unwrap();
    }

    let query = PetListQuery {
        limit: Some(2),
        offset: 1,
        ..PetListQuery::default()
    };
    let page = repo.query(&PetAddress::collection(), &query).unwrap();

    let names: Vec<&str> = page.iter().map(|pet| pet.name.as_str()).collect();
    assert_eq!(names, ["B", "C"]);
}

#[test]
fn query_item_address_with_no_match_yields_empty_sequence() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqlitePetRepository::try_new(&conn).unwrap();

    let pets = repo
        .query(&PetAddress::item(123), &PetListQuery::default())
        .unwrap();
    assert!(pets.is_empty());
}

#[test]
fn repository_rejects_uninitialized_connection() {
    let conn = Connection::open_in_memory().unwrap();

    let result = SqlitePetRepository::try_new(&conn);
    match result {
        Err(RepoError::UninitializedConnection {
            expected_version,
            actual_version: 0,
        }) => assert!(expected_version > 0),
        Err(other) => panic!("unexpected error: {other}"),
        Ok(_) => panic!("expected uninitialized connection error"),
    }
}

#[test]
fn repository_rejects_connection_without_pets_table() {
    let conn = Connection::open_in_memory().unwrap();
    conn.execute_batch(&format!(
        "PRAGMA user_version = {};",
        shelter_core::SCHEMA_VERSION
    ))
    .unwrap();

    let result = SqlitePetRepository::try_new(&conn);
    assert!(matches!(result, Err(RepoError::MissingRequiredTable("pets"))));
}

#[test]
fn repository_rejects_connection_missing_required_column() {
    let conn = Connection::open_in_memory().unwrap();
    conn.execute_batch(
        "CREATE TABLE pets (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL,
            breed TEXT,
            gender INTEGER NOT NULL DEFAULT 0
        );",
    )
    .unwrap();
    conn.execute_batch(&format!(
        "PRAGMA user_version = {};",
        shelter_core::SCHEMA_VERSION
    ))
    .unwrap();

    let result = SqlitePetRepository::try_new(&conn);
    assert!(matches!(
        result,
        Err(RepoError::MissingRequiredColumn {
            table: "pets",
            column: "weight"
        })
    ));
}

#[test]
fn service_skips_blank_draft() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqlitePetRepository::try_new(&conn).unwrap();
    let service = PetService::new(repo);

    let saved = service.add_pet(&PetValues::default()).unwrap();
    assert_eq!(saved, None);

    // Unknown gender, empty strings and zero weight are still "blank".
    let untouched = PetValues {
        name: Some(String::new()),
        breed: Some(String::new()),
        gender: Some(0),
        weight: Some(0),
    };
    assert_eq!(service.add_pet(&untouched).unwrap(), None);
    assert!(service.list_pets(&PetListQuery::default()).unwrap().is_empty());
}

#[test]
fn service_crud_flow() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqlitePetRepository::try_new(&conn).unwrap();
    let service = PetService::new(repo);

    let id = service
        .add_pet(&values("Tula", "Terrier", Gender::Female.code(), 6))
        .unwrap()
        .expect("non-blank draft should be saved");

    let pet = service.get_pet(id).unwrap().unwrap();
    assert_eq!(pet.name, "Tula");

    let changed = service
        .update_pet(
            id,
            &PetValues {
                breed: Some("Terrier Mix".to_string()),
                ..PetValues::default()
            },
        )
        .unwrap();
    assert_eq!(changed, 1);
    assert_eq!(service.get_pet(id).unwrap().unwrap().breed, "Terrier Mix");

    assert_eq!(service.delete_pet(id).unwrap(), 1);
    assert_eq!(service.get_pet(id).unwrap(), None);
}

#[test]
fn service_sample_pet_and_clear() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqlitePetRepository::try_new(&conn).unwrap();
    let service = PetService::new(repo);

    let id = service.insert_sample_pet().unwrap();
    let pet = service.get_pet(id).unwrap().unwrap();
    assert_eq!(pet.name, "Dummy");
    assert_eq!(pet.breed, "Makebelievien Poodle");
    assert_eq!(pet.gender, Gender::Male);
    assert_eq!(pet.weight, 200);

    service.insert_sample_pet().unwrap();
    assert_eq!(service.clear_pets().unwrap(), 2);
    assert!(service.list_pets(&PetListQuery::default()).unwrap().is_empty());
}
