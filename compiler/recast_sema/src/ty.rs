//! Types as far as the refactorings need them.
//!
//! Only collection shape matters: whether a type is enumerable, whether it has
//! a length member and an indexer, and what its elements are.

use recast_ir::{Name, StringInterner};

#[derive(Clone, Debug, PartialEq, Eq, Hash, Default)]
pub enum Ty {
    Named { name: Name, args: Vec<Ty> },
    Array(Box<Ty>),
    #[default]
    Unknown,
}

impl Ty {
    pub fn named(name: Name) -> Ty {
        Ty::Named {
            name,
            args: Vec::new(),
        }
    }

    pub fn is_unknown(&self) -> bool {
        matches!(self, Ty::Unknown)
    }

    /// Render the type for messages and logs.
    pub fn display(&self, interner: &StringInterner) -> String {
        match self {
            Ty::Named { name, args } if args.is_empty() => interner.lookup(*name).to_owned(),
            Ty::Named { name, args } => {
                let args: Vec<_> = args.iter().map(|a| a.display(interner)).collect();
                format!("{}<{}>", interner.lookup(*name), args.join(", "))
            }
            Ty::Array(elem) => format!("{}[]", elem.display(interner)),
            Ty::Unknown => "?".to_owned(),
        }
    }
}

/// Length member and element type of an indexable collection.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CollectionShape {
    /// `Length` or `Count`.
    pub length_member: Name,
    pub element: Ty,
}

/// Names the type queries compare against, interned once per model.
#[derive(Clone, Debug)]
pub(crate) struct KnownNames {
    pub int: Name,
    pub string: Name,
    pub bool_: Name,
    pub char_: Name,
    pub length: Name,
    pub count: Name,
    pub var: Name,
    integral: [Name; 8],
    /// Generic types with `Count` and an indexer.
    indexable: [Name; 5],
    /// Generic types that can only be enumerated.
    enumerable: [Name; 6],
    pub where_: Name,
    pub select: Name,
    pub to_array: Name,
    pub to_list: Name,
    pub first: Name,
    pub any: Name,
    pub all: Name,
    pub ienumerable: Name,
    pub list: Name,
}

impl KnownNames {
    pub fn new(interner: &StringInterner) -> Self {
        let i = |s: &str| interner.intern(s);
        KnownNames {
            int: i("int"),
            string: i("string"),
            bool_: i("bool"),
            char_: i("char"),
            length: i("Length"),
            count: i("Count"),
            var: i("var"),
            integral: [
                i("int"),
                i("long"),
                i("short"),
                i("byte"),
                i("sbyte"),
                i("uint"),
                i("ulong"),
                i("ushort"),
            ],
            indexable: [
                i("List"),
                i("IList"),
                i("IReadOnlyList"),
                i("ImmutableArray"),
                i("ImmutableList"),
            ],
            enumerable: [
                i("IEnumerable"),
                i("ICollection"),
                i("IReadOnlyCollection"),
                i("HashSet"),
                i("ISet"),
                i("Queue"),
            ],
            where_: i("Where"),
            select: i("Select"),
            to_array: i("ToArray"),
            to_list: i("ToList"),
            first: i("First"),
            any: i("Any"),
            all: i("All"),
            ienumerable: i("IEnumerable"),
            list: i("List"),
        }
    }

    pub fn is_integral(&self, ty: &Ty) -> bool {
        matches!(ty, Ty::Named { name, args } if args.is_empty() && self.integral.contains(name))
    }

    pub fn collection_shape(&self, ty: &Ty) -> Option<CollectionShape> {
        match ty {
            Ty::Array(elem) => Some(CollectionShape {
                length_member: self.length,
                element: (**elem).clone(),
            }),
            Ty::Named { name, args } if *name == self.string && args.is_empty() => {
                Some(CollectionShape {
                    length_member: self.length,
                    element: Ty::named(self.char_),
                })
            }
            Ty::Named { name, args } if args.len() == 1 && self.indexable.contains(name) => {
                Some(CollectionShape {
                    length_member: self.count,
                    element: args[0].clone(),
                })
            }
            _ => None,
        }
    }

    pub fn element_type(&self, ty: &Ty) -> Ty {
        if let Some(shape) = self.collection_shape(ty) {
            return shape.element;
        }
        match ty {
            Ty::Named { name, args } if args.len() == 1 && self.enumerable.contains(name) => {
                args[0].clone()
            }
            _ => Ty::Unknown,
        }
    }

    pub fn enumerable_of(&self, element: Ty) -> Ty {
        Ty::Named {
            name: self.ienumerable,
            args: vec![element],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collection_shapes() {
        let interner = StringInterner::new();
        let known = KnownNames::new(&interner);
        let int = Ty::named(known.int);

        let array = Ty::Array(Box::new(int.clone()));
        let shape = known.collection_shape(&array);
        assert_eq!(shape.map(|s| s.length_member), Some(known.length));

        let list = Ty::Named {
            name: interner.intern("IReadOnlyList"),
            args: vec![int.clone()],
        };
        assert_eq!(
            known.collection_shape(&list),
            Some(CollectionShape {
                length_member: known.count,
                element: int.clone(),
            })
        );

        let seq = known.enumerable_of(int.clone());
        assert_eq!(known.collection_shape(&seq), None);
        assert_eq!(known.element_type(&seq), int);
        assert_eq!(known.element_type(&Ty::Unknown), Ty::Unknown);
    }

    #[test]
    fn test_integral_and_display() {
        let interner = StringInterner::new();
        let known = KnownNames::new(&interner);
        assert!(known.is_integral(&Ty::named(interner.intern("long"))));
        assert!(!known.is_integral(&Ty::named(known.string)));

        let ty = Ty::Array(Box::new(known.enumerable_of(Ty::named(known.int))));
        assert_eq!(ty.display(&interner), "IEnumerable<int>[]");
    }
}
