//! Functor and applicative law checks for every test record type.
//!
//! Rather than conjuring up fake functions like "add 1", the checks use [`Func`]s: each one
//! records the calls made to it, so two expressions agree only if they evaluate the same
//! functions on the same arguments.
use std::rc::Rc;

/// A value equal only to itself and its clones.
#[derive(Clone, Debug)]
pub struct Token(Rc<()>);

impl Token {
    pub fn new() -> Self {
        Token(Rc::new(()))
    }
}

impl Default for Token {
    fn default() -> Self {
        Self::new()
    }
}

impl PartialEq for Token {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl Eq for Token {}

/// A record of calling a [`Func`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Eval<A> {
    pub caller: Token,
    pub arg: A,
}

/// A fresh arbitrary function.
///
/// Different functions applied to the same value give different results, and the same function
/// applied to different values does too.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct Func {
    caller: Token,
}

impl Func {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn call<A>(&self, arg: A) -> Eval<A> {
        Eval {
            caller: self.caller.clone(),
            arg,
        }
    }

    pub fn boxed<A: 'static>(self) -> Fun<A, Eval<A>> {
        Box::new(move |arg: A| self.call(arg))
    }
}

pub type Fun<A, B> = Box<dyn Fn(A) -> B>;

pub fn identity<A>(a: A) -> A {
    a
}

/// Curried function composition: `compose(f)(g)(a) == f(g(a))`.
pub fn compose<A: 'static, B: 'static, C: 'static>(f: Fun<B, C>) -> Fun<Fun<A, B>, Fun<A, C>> {
    let f: Rc<dyn Fn(B) -> C> = Rc::from(f);
    Box::new(move |g: Fun<A, B>| -> Fun<A, C> {
        let f = Rc::clone(&f);
        Box::new(move |a: A| f(g(a)))
    })
}

/// A function applying its argument to `z`.
pub fn apply_to<A: Clone + 'static, B: 'static>(z: A) -> impl Fn(Fun<A, B>) -> B + Clone {
    move |g: Fun<A, B>| g(z.clone())
}

#[cfg(test)]
macro_rules! law_suite {
    ($suite:ident, $record:ident) => {
        mod $suite {
            use crate::laws::*;
            use crate::records::*;
            use fieldwise::{amap, fmap, names, pure, values};
            use proptest::prelude::*;

            proptest! {
                #[test]
                fn functor_laws(x in arb_record::<$record<i64>>()) {
                    prop_assert_eq!(fmap(identity, x.clone()).unwrap(), x.clone());

                    let (f, g) = (Func::new(), Func::new());
                    let composed = fmap(|v| f.call(g.call(v)), x.clone()).unwrap();
                    let sequenced = fmap(|v| f.call(v), fmap(|v| g.call(v), x).unwrap()).unwrap();
                    prop_assert_eq!(composed, sequenced);
                }

                #[test]
                fn applicative_laws(x in arb_record::<$record<i64>>()) {
                    let f = Func::new();
                    let z = Token::new();
                    let u_funcs = fmap(|_| Func::new(), x.clone()).unwrap();
                    let v_funcs = fmap(|_| Func::new(), x.clone()).unwrap();

                    // identity
                    let applied = amap(pure(&x, identity::<i64>).unwrap(), x.clone()).unwrap();
                    prop_assert_eq!(applied, x.clone());

                    // homomorphism
                    let call_f = |v: Token| f.call(v);
                    let lifted = amap(pure(&x, call_f).unwrap(), pure(&x, z.clone()).unwrap());
                    prop_assert_eq!(lifted.unwrap(), pure(&x, f.call(z.clone())).unwrap());

                    // interchange
                    let u = || fmap(Func::boxed::<Token>, u_funcs.clone()).unwrap();
                    let lhs = amap(u(), pure(&u(), z.clone()).unwrap()).unwrap();
                    let apply_z = apply_to::<Token, Eval<Token>>(z.clone());
                    let rhs = amap(pure(&u(), apply_z).unwrap(), u()).unwrap();
                    prop_assert_eq!(lhs, rhs);

                    // composition
                    let u = || fmap(Func::boxed::<Eval<i64>>, u_funcs.clone()).unwrap();
                    let v = || fmap(Func::boxed::<i64>, v_funcs.clone()).unwrap();
                    let composer = compose::<i64, Eval<i64>, Eval<Eval<i64>>>;
                    let lhs = amap(
                        amap(amap(pure(&u(), composer).unwrap(), u()).unwrap(), v()).unwrap(),
                        x.clone(),
                    )
                    .unwrap();
                    let rhs = amap(u(), amap(v(), x).unwrap()).unwrap();
                    prop_assert_eq!(lhs, rhs);
                }

                #[test]
                fn values_match_names(x in arb_record::<$record<i64>>(), fill in any::<i64>()) {
                    prop_assert_eq!(values(&x).len(), names::<$record<i64>>().len());

                    let filled = pure(&x, fill).unwrap();
                    prop_assert!(values(&filled).into_iter().all(|v| *v == fill));
                    prop_assert_eq!(values(&filled).len(), values(&x).len());
                }
            }
        }
    };
}

#[cfg(test)]
law_suite!(f0_laws, F0);
#[cfg(test)]
law_suite!(f1_laws, F1);
#[cfg(test)]
law_suite!(f2_laws, F2);
#[cfg(test)]
law_suite!(f3_laws, F3);
#[cfg(test)]
law_suite!(g4_laws, G4);
#[cfg(test)]
law_suite!(f2_ext_laws, F2Ext);
#[cfg(test)]
law_suite!(g4_redeclared_laws, G4Redeclared);
