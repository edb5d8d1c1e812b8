macro_rules! field_ref {
    ($prop:ident, $rtrn:ty) => {
        pub fn $prop(&self) -> &$rtrn {
            &self.$prop
        }
    };
}

pub(self) use field_ref;

pub mod catalog;
