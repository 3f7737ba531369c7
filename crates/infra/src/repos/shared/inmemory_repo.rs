use booking_notifier_domain::Entity;
use std::sync::Mutex;

/// Useful functions for creating inmemory repositories

pub fn insert<T: Clone>(val: &T, collection: &Mutex<Vec<T>>) {
    let mut collection = collection.lock().unwrap();
    collection.push(val.clone());
}

pub fn find_by<T: Clone, F: FnMut(&T) -> bool>(collection: &Mutex<Vec<T>>, mut compare: F) -> Vec<T> {
    let collection = collection.lock().unwrap();
    collection
        .iter()
        .filter(|item| compare(item))
        .cloned()
        .collect()
}

pub fn count_by<T, F: FnMut(&T) -> bool>(collection: &Mutex<Vec<T>>, mut compare: F) -> i64 {
    let collection = collection.lock().unwrap();
    collection.iter().filter(|item| compare(item)).count() as i64
}

/// Replaces the stored value with the same id or inserts it if there is none
pub fn upsert<T: Clone + Entity>(val: &T, collection: &Mutex<Vec<T>>) {
    let mut collection = collection.lock().unwrap();
    match collection.iter().position(|item| item.id() == val.id()) {
        Some(index) => collection[index] = val.clone(),
        None => collection.push(val.clone()),
    }
}
