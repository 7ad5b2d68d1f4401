use crate::ClassId;

// -----------------------------------------------------------------------------
// DispatchTable

/// Per-class handler lookup, indexed by [`ClassId::id`].
///
/// The table grows on registration, so handlers may be added for class ids
/// allocated after the table was created.
#[derive(Clone)]
pub struct DispatchTable<H> {
    methods: Vec<Option<H>>,
}

impl<H: Copy> DispatchTable<H> {
    /// Creates an empty table sized for the classes known so far.
    pub fn new() -> Self {
        let len = ClassId::class_count() as usize;
        Self {
            methods: vec![None; len],
        }
    }

    /// Sets the handler for `class_id`, returning the previous one.
    pub fn register(&mut self, class_id: ClassId, method: H) -> Option<H> {
        let index = class_id.id() as usize;
        if index >= self.methods.len() {
            self.methods.resize(index + 1, None);
        }
        let previous = self.methods[index].replace(method);
        if previous.is_some() {
            log::debug!("replacing mapper method for class `{class_id}`");
        }
        previous
    }

    #[inline]
    pub fn lookup(&self, class_id: ClassId) -> Option<H> {
        self.methods.get(class_id.id() as usize).copied().flatten()
    }
}

#[cfg(test)]
mod tests {
    use super::DispatchTable;
    use crate::ClassId;

    #[test]
    fn grows_for_late_classes() {
        let mut table: DispatchTable<u8> = DispatchTable::new();
        assert_eq!(table.register(ClassId::STRING, 1), None);
        assert_eq!(table.register(ClassId::STRING, 2), Some(1));
        assert_eq!(table.lookup(ClassId::STRING), Some(2));

        let late = ClassId::register("Late");
        assert_eq!(table.lookup(late), None);
        table.register(late, 9);
        assert_eq!(table.lookup(late), Some(9));
    }
}
