use std::borrow::Cow;

use smol_str::SmolStr;

#[derive(Debug, Clone, PartialEq)]
pub enum Bind {
    Null,
    Bool(bool),
    I64(i64),
    U64(u64),
    F64(f64),
    String(String),
    Bytes(Vec<u8>),
}

pub type Binds = Array<Bind>;

// small lists are the common case, avoid the vec until a second value shows up
#[derive(Debug, Default, Clone, PartialEq)]
pub enum Array<T> {
    #[default]
    None,
    One(T),
    Many(Vec<T>),
}

impl<T> Array<T> {
    pub fn push(&mut self, value: T) {
        self.append(Self::One(value));
    }

    pub fn append(&mut self, other: Self) {
        let combined = match (std::mem::replace(self, Self::None), other) {
            (Self::None, items) | (items, Self::None) => items,
            (Self::One(a), Self::One(b)) => Self::Many(vec![a, b]),
            (Self::One(a), Self::Many(mut b)) => {
                b.insert(0, a);
                Self::Many(b)
            }
            (Self::Many(mut a), Self::One(b)) => {
                a.push(b);
                Self::Many(a)
            }
            (Self::Many(mut a), Self::Many(mut b)) => {
                a.append(&mut b);
                Self::Many(a)
            }
        };
        *self = combined;
    }

    pub fn len(&self) -> usize {
        match self {
            Array::None => 0,
            Array::One(_) => 1,
            Array::Many(items) => items.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn take(&mut self) -> Self {
        std::mem::take(self)
    }

    pub fn as_slice(&self) -> &[T] {
        match self {
            Array::None => &[],
            Array::One(one) => std::slice::from_ref(one),
            Array::Many(many) => many.as_slice(),
        }
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.as_slice().iter()
    }

    pub fn into_vec(self) -> Vec<T> {
        match self {
            Self::None => Vec::new(),
            Self::One(one) => Vec::from([one]),
            Self::Many(many) => many,
        }
    }
}

impl<T> FromIterator<T> for Array<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut array = Self::None;
        for item in iter {
            array.push(item);
        }
        array
    }
}

pub trait IntoBind {
    fn into_bind(self) -> Bind;
}

pub trait IntoBinds {
    fn into_binds(self) -> Binds;
}

impl IntoBinds for Binds {
    fn into_binds(self) -> Binds {
        self
    }
}

impl IntoBinds for () {
    fn into_binds(self) -> Binds {
        Binds::None
    }
}

impl<T> IntoBinds for T
where
    T: IntoBind,
{
    fn into_binds(self) -> Binds {
        Binds::One(self.into_bind())
    }
}

impl<T> IntoBinds for Vec<T>
where
    T: IntoBind,
{
    fn into_binds(self) -> Binds {
        self.into_iter().map(IntoBind::into_bind).collect()
    }
}

impl<T, const N: usize> IntoBinds for [T; N]
where
    T: IntoBind,
{
    fn into_binds(self) -> Binds {
        self.into_iter().map(IntoBind::into_bind).collect()
    }
}

impl IntoBind for Bind {
    fn into_bind(self) -> Bind {
        self
    }
}

impl<T> IntoBind for Option<T>
where
    T: IntoBind,
{
    fn into_bind(self) -> Bind {
        if let Some(value) = self {
            value.into_bind()
        } else {
            Bind::Null
        }
    }
}

macro_rules! signed_bind {
    ($($ty:ty),+) => {
        $(
            impl IntoBind for $ty {
                fn into_bind(self) -> Bind {
                    Bind::I64(i64::from(self))
                }
            }
        )+
    };
}

macro_rules! unsigned_bind {
    ($($ty:ty),+) => {
        $(
            impl IntoBind for $ty {
                fn into_bind(self) -> Bind {
                    Bind::U64(u64::from(self))
                }
            }
        )+
    };
}

signed_bind!(i8, i16, i32, i64);
unsigned_bind!(u8, u16, u32, u64);

impl IntoBind for bool {
    fn into_bind(self) -> Bind {
        Bind::Bool(self)
    }
}

impl IntoBind for f32 {
    fn into_bind(self) -> Bind {
        Bind::F64(f64::from(self))
    }
}

impl IntoBind for f64 {
    fn into_bind(self) -> Bind {
        Bind::F64(self)
    }
}

impl IntoBind for &str {
    fn into_bind(self) -> Bind {
        Bind::String(self.to_owned())
    }
}

impl IntoBind for &String {
    fn into_bind(self) -> Bind {
        Bind::String(self.clone())
    }
}

impl IntoBind for String {
    fn into_bind(self) -> Bind {
        Bind::String(self)
    }
}

impl IntoBind for Cow<'_, str> {
    fn into_bind(self) -> Bind {
        Bind::String(self.into_owned())
    }
}

impl IntoBind for SmolStr {
    fn into_bind(self) -> Bind {
        Bind::String(self.to_string())
    }
}

impl IntoBind for &[u8] {
    fn into_bind(self) -> Bind {
        Bind::Bytes(self.to_vec())
    }
}

#[cfg(feature = "mysql")]
pub(crate) fn into_mysql_arguments(binds: Binds) -> crate::Result<sqlx::mysql::MySqlArguments> {
    use sqlx::Arguments;

    let mut args = sqlx::mysql::MySqlArguments::default();
    args.reserve(binds.len(), 0);
    for (index, bind) in binds.into_vec().into_iter().enumerate() {
        let added = match bind {
            Bind::Null => args.add(Option::<String>::None),
            Bind::Bool(value) => args.add(value),
            Bind::I64(value) => args.add(value),
            Bind::U64(value) => args.add(value),
            Bind::F64(value) => args.add(value),
            Bind::String(value) => args.add(value),
            Bind::Bytes(value) => args.add(value),
        };
        added.map_err(|err| crate::Error::Encode {
            index,
            message: err.to_string(),
        })?;
    }
    Ok(args)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_array_append_keeps_order() {
        let mut binds = Binds::None;
        binds.push(1i32.into_bind());
        binds.append([2i32, 3].into_binds());
        binds.append(Binds::None);
        binds.push("four".into_bind());
        assert_eq!(4, binds.len());
        assert_eq!(
            vec![
                Bind::I64(1),
                Bind::I64(2),
                Bind::I64(3),
                Bind::String("four".into())
            ],
            binds.into_vec()
        );
    }

    #[test]
    fn test_option_into_null() {
        let none: Option<i32> = None;
        assert_eq!(Bind::Null, none.into_bind());
        assert_eq!(Bind::U64(7), Some(7u8).into_bind());
    }

    #[test]
    fn test_unit_is_empty() {
        assert!(().into_binds().is_empty());
        assert_eq!(0, Binds::None.as_slice().len());
    }
}
