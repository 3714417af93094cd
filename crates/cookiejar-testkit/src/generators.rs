//! Proptest generators for property-based testing.

use proptest::prelude::*;

use cookiejar_core::{Action, Keypair, Signer};

/// Generate a random keypair.
pub fn keypair() -> impl Strategy<Value = Keypair> {
    any::<[u8; 32]>().prop_filter_map("secret out of range", |secret| {
        Keypair::from_secret(&secret).ok()
    })
}

/// Generate an identity (hex compressed public key).
pub fn identity() -> impl Strategy<Value = String> {
    keypair().prop_map(|kp| kp.public_key().to_hex())
}

/// Generate an amount small enough that sums never overflow.
pub fn amount() -> impl Strategy<Value = u64> {
    0u64..=1_000_000
}

/// Generate any action.
pub fn action() -> impl Strategy<Value = Action> {
    prop_oneof![
        amount().prop_map(Action::Bake),
        amount().prop_map(Action::Eat),
        Just(Action::Clear),
    ]
}

/// Generate payload text the handler must reject as malformed.
pub fn malformed_payload() -> impl Strategy<Value = String> {
    prop_oneof![
        "(bake|eat),-[0-9]{1,6}",
        "(bake|eat),[0-9]{0,3}[a-z+ .][0-9]{0,3}",
        "(bake|eat)",
        "(bake|eat),[0-9]{1,4},[0-9]{1,4}",
        "clear,[0-9]{0,4}",
        "(Bake|EAT|roast|nibble)(,[0-9]{1,3})?",
        Just(String::new()),
    ]
}

/// A sequence of actions against one jar, with the expected outcome of each.
#[derive(Debug, Clone)]
pub struct JarScript {
    pub actions: Vec<Action>,
}

impl JarScript {
    /// Replay the script against a reference model of the jar.
    ///
    /// Returns, per action, whether it should be accepted, and the final
    /// stored count (`None` if the jar was never created).
    pub fn expected(&self) -> (Vec<bool>, Option<u64>) {
        let mut count: Option<u64> = None;
        let accepted = self
            .actions
            .iter()
            .map(|action| match (*action, count) {
                (Action::Bake(n), c) => match c.unwrap_or(0).checked_add(n) {
                    Some(next) => {
                        count = Some(next);
                        true
                    }
                    None => false,
                },
                (Action::Eat(n), Some(c)) if c >= n => {
                    count = Some(c - n);
                    true
                }
                (Action::Clear, Some(_)) => {
                    count = Some(0);
                    true
                }
                _ => false,
            })
            .collect();
        (accepted, count)
    }
}

impl Arbitrary for JarScript {
    type Parameters = ();
    type Strategy = BoxedStrategy<Self>;

    fn arbitrary_with(_: Self::Parameters) -> Self::Strategy {
        prop::collection::vec(action(), 0..12)
            .prop_map(|actions| JarScript { actions })
            .boxed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cookiejar_core::address_for;
    use cookiejar_processor::{CookieJarHandler, MemoryState};

    fn stored(state: &MemoryState, identity: &str) -> Option<u64> {
        state
            .get(&address_for(identity))
            .unwrap()
            .map(|b| String::from_utf8(b).unwrap().parse().unwrap())
    }

    #[test]
    fn test_model_examples() {
        let script = JarScript {
            actions: vec![
                Action::Eat(1),
                Action::Bake(5),
                Action::Bake(3),
                Action::Eat(20),
                Action::Eat(8),
                Action::Clear,
            ],
        };
        let (accepted, count) = script.expected();
        assert_eq!(accepted, vec![false, true, true, false, true, true]);
        assert_eq!(count, Some(0));
    }

    proptest! {
        #[test]
        fn handler_matches_model(script in any::<JarScript>(), signer in identity()) {
            let handler = CookieJarHandler::new();
            let state = MemoryState::new();
            let declared = vec![address_for(&signer).as_str().to_string()];
            let (expected, final_count) = script.expected();

            for (action, should_accept) in script.actions.iter().zip(expected) {
                let mut ctx = state.scope();
                ctx.declare(&declared, &declared);
                let result = handler.apply_action(*action, &signer, &mut ctx);
                prop_assert_eq!(result.is_ok(), should_accept, "{}", action);
                if result.is_ok() {
                    ctx.commit().unwrap();
                }
            }
            prop_assert_eq!(stored(&state, &signer), final_count);
        }

        #[test]
        fn malformed_payloads_rejected(text in malformed_payload()) {
            prop_assert!(Action::decode(text.as_bytes()).is_err(), "{:?}", text);
        }
    }
}
