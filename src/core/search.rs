use crate::domain::model::{Guardian, Registration, User};

/// A record that the dashboard search box can match against.
pub trait Searchable {
    fn search_fields(&self) -> Vec<&str>;

    fn matches(&self, needle: &str) -> bool {
        self.search_fields()
            .iter()
            .any(|field| field.to_lowercase().contains(needle))
    }
}

impl Searchable for Guardian {
    fn search_fields(&self) -> Vec<&str> {
        let mut fields = vec![self.name.as_str()];
        fields.extend(self.email.as_deref());
        fields.extend(self.mobile.as_deref());
        fields.extend(self.cnic.as_deref());
        fields
    }
}

impl Searchable for User {
    fn search_fields(&self) -> Vec<&str> {
        let mut fields = vec![self.name.as_str(), self.email.as_str()];
        fields.extend(self.phone.as_deref());
        fields.extend(self.subject.as_deref());
        fields
    }
}

impl Searchable for Registration {
    fn search_fields(&self) -> Vec<&str> {
        let mut fields = vec![self.name.as_str()];
        fields.extend(self.father_name.as_deref());
        fields.extend(self.roll_number.as_deref());
        fields.extend(self.mobile.as_deref());
        fields
    }
}

/// Records whose searchable fields contain `query`, ignoring case.
/// A blank query keeps every record. Order is preserved.
pub fn filter_records<'a, T: Searchable>(records: &'a [T], query: &str) -> Vec<&'a T> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return records.iter().collect();
    }
    records.iter().filter(|r| r.matches(&needle)).collect()
}
