//! Static user-facing reply texts

pub const WELCOME: &str = "Welcome! Please, ask me for some dog pictures, \
using command /dog. Or you can ask for /help";

pub const HELP: &str = "You can ask for a picture of random dog, using command /dog. \
If you want a picture of a special breed, you can use command /breed with the name \
of the breed right after it. \n\n\
Example: \n\
/breed shiba\n\n\
To get the list of all available breeds, use command /all";

pub const NOT_FOUND: &str = "Sorry, we cannot find it. Try something else.";

pub const WRONG_INPUT: &str = "Ooops, you did something wrong...";

pub const BREED_USAGE: &str = "Please give me exactly one breed name, like: /breed shiba";

pub const SELECT_SUB_BREED: &str = "Select sub-breed";
