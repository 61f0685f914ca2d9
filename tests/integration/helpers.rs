//! Shared test helpers for integration tests.

use std::collections::HashMap;
use std::sync::Arc;

use repokit_core::traits::entity::{Described, Entity, Record};
use repokit_core::types::schema::{FieldDef, ScalarKind, Schema};
use repokit_core::types::value::FieldValue;
use repokit_memory::MemoryStore;
use repokit_query::{FieldResolver, SpecRepository};

#[derive(Debug, Clone, PartialEq)]
pub struct Owner {
    pub id: u32,
    pub name: String,
}

static OWNER_SCHEMA: Schema = Schema::new(
    "Owner",
    &[
        FieldDef::scalar("id", ScalarKind::Int),
        FieldDef::scalar("name", ScalarKind::Text),
    ],
);

impl Record for Owner {
    fn field(&self, name: &str) -> Option<FieldValue<'_>> {
        match name {
            "id" => Some(FieldValue::Int(i64::from(self.id))),
            "name" => Some(FieldValue::from(&self.name)),
            _ => None,
        }
    }
}

impl Described for Owner {
    fn schema() -> &'static Schema {
        &OWNER_SCHEMA
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Pet {
    pub id: u32,
    pub name: String,
    pub age: i64,
    pub owner_id: Option<u32>,
    pub owner: Option<Owner>,
}

static PET_SCHEMA: Schema = Schema::new(
    "Pet",
    &[
        FieldDef::scalar("id", ScalarKind::Int),
        FieldDef::scalar("name", ScalarKind::Text),
        FieldDef::scalar("age", ScalarKind::Int),
        FieldDef::nested("owner", <Owner as Described>::schema),
    ],
);

impl Record for Pet {
    fn field(&self, name: &str) -> Option<FieldValue<'_>> {
        match name {
            "id" => Some(FieldValue::Int(i64::from(self.id))),
            "name" => Some(FieldValue::from(&self.name)),
            "age" => Some(FieldValue::Int(self.age)),
            "owner" => Some(match &self.owner {
                Some(owner) => FieldValue::Record(owner),
                None => FieldValue::Null,
            }),
            _ => None,
        }
    }
}

impl Described for Pet {
    fn schema() -> &'static Schema {
        &PET_SCHEMA
    }
}

impl Entity for Pet {
    type Id = u32;

    fn id(&self) -> u32 {
        self.id
    }
}

pub fn pet(id: u32, name: &str, age: i64, owner_id: Option<u32>) -> Pet {
    Pet {
        id,
        name: name.to_string(),
        age,
        owner_id,
        owner: None,
    }
}

/// Test context: a store plus a repository with its own resolver.
pub struct TestRepo {
    pub store: Arc<MemoryStore<Pet>>,
    pub repo: SpecRepository<Pet, MemoryStore<Pet>>,
    pub resolver: Arc<FieldResolver>,
}

impl TestRepo {
    /// A store holding `pets`, with `"owner"` loadable from `owners`.
    pub fn new(pets: Vec<Pet>, owners: Vec<Owner>) -> Self {
        let directory: HashMap<u32, Owner> = owners.into_iter().map(|o| (o.id, o)).collect();
        let store = MemoryStore::with_rows(pets).with_relation("owner", move |pet: &mut Pet| {
            pet.owner = pet.owner_id.and_then(|id| directory.get(&id).cloned());
        });
        let store = Arc::new(store);
        let resolver = Arc::new(FieldResolver::new());
        let repo = SpecRepository::with_resolver(Arc::clone(&store), Arc::clone(&resolver));
        Self {
            store,
            repo,
            resolver,
        }
    }

    /// `count` pets with ids `1..=count`, no owners.
    pub fn numbered(count: u32) -> Self {
        let pets = (1..=count)
            .map(|id| pet(id, &format!("pet-{id:02}"), i64::from(id % 7), None))
            .collect();
        Self::new(pets, Vec::new())
    }

    /// Five pets across three owners, one without an owner.
    pub fn household() -> Self {
        let owners = vec![
            Owner {
                id: 1,
                name: "zoe".to_string(),
            },
            Owner {
                id: 2,
                name: "adam".to_string(),
            },
            Owner {
                id: 3,
                name: "mona".to_string(),
            },
        ];
        let pets = vec![
            pet(1, "rex", 4, Some(1)),
            pet(2, "tom", 2, Some(2)),
            pet(3, "kit", 4, Some(3)),
            pet(4, "bo", 1, None),
            pet(5, "ace", 2, Some(2)),
        ];
        Self::new(pets, owners)
    }
}

pub fn ids(pets: &[Pet]) -> Vec<u32> {
    pets.iter().map(|p| p.id).collect()
}
