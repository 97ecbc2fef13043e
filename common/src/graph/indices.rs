/// Generates a typed handle into one of the id-indexed arenas. A handle is
/// created from an arena position and hands it back through `index()`; the
/// raw `u32` stays reachable for variable and row names.
#[macro_export]
macro_rules! define_index {
    ($name:ident) => {
        #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub struct $name(pub u32);

        impl From<usize> for $name {
            fn from(pos: usize) -> Self {
                $name(pos as u32)
            }
        }

        impl $name {
            /// Position in the owning arena.
            #[inline]
            pub fn index(self) -> usize {
                self.0 as usize
            }
        }
    };
}

define_index!(CombNodeId);
define_index!(CombEdgeId);
define_index!(LineId);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip() {
        let id = CombNodeId::from(7usize);
        assert_eq!(id.index(), 7);
        assert_eq!(format!("{:?}", id), "CombNodeId(7)");
    }
}
